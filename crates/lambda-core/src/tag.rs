// SPDX-License-Identifier: Apache-2.0

//! Type tags for [`crate::Item`].
//!
//! Ordinal order is a stable contract: tags are compared with `>=` to
//! distinguish containers from immediates/boxed scalars, so reordering this
//! enum changes runtime behavior, not just readability.

/// Top-byte discriminant of an [`crate::Item`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Escape hatch for embedding a raw address (used by the link layer).
    RawPointer = 0,
    /// The `null` literal.
    Null = 1,
    /// The `undefined` sentinel (unset variable, missing field).
    Undefined = 2,
    /// `true` / `false`.
    Bool = 3,
    /// 32-bit signed integer, immediate.
    Int = 4,
    /// 64-bit signed integer, boxed on the number stack.
    Int64 = 5,
    /// 64-bit float, boxed on the number stack.
    Float = 6,
    /// Arbitrary-precision decimal, boxed on the number stack.
    Decimal = 7,
    /// Abstract numeric supertype, used only for type-registry bookkeeping.
    Number = 8,
    /// Calendar timestamp, boxed on the number stack.
    DateTime = 9,
    /// Interned symbol (ref-counted byte block).
    Symbol = 10,
    /// UTF-8 string (ref-counted byte block).
    String = 11,
    /// Arbitrary byte block (ref-counted).
    Binary = 12,
    /// Ordered list container. Tags from here on are heap containers.
    List = 13,
    /// Lazy integer range.
    Range = 14,
    /// Unboxed `int` array.
    ArrayInt = 15,
    /// Unboxed `int64` array.
    ArrayInt64 = 16,
    /// Unboxed `float` array.
    ArrayFloat = 17,
    /// Typed array of arbitrary items.
    Array = 18,
    /// Ordered key → item mapping.
    Map = 19,
    /// Document-tree node: a map plus an ordered child list and tag name.
    Element = 20,
    /// A reified type descriptor.
    Type = 21,
    /// A compiled or native function.
    Func = 22,
    /// The top type - matches any tag.
    Any = 23,
    /// Sentinel used to propagate arithmetic/coercion failures.
    Error = 24,
}

impl Tag {
    /// Decode a tag from its raw ordinal.
    ///
    /// # Panics
    ///
    /// Panics if `raw` does not correspond to a known tag - this indicates a
    /// corrupted `Item` bit pattern, not a recoverable runtime condition.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::RawPointer,
            1 => Self::Null,
            2 => Self::Undefined,
            3 => Self::Bool,
            4 => Self::Int,
            5 => Self::Int64,
            6 => Self::Float,
            7 => Self::Decimal,
            8 => Self::Number,
            9 => Self::DateTime,
            10 => Self::Symbol,
            11 => Self::String,
            12 => Self::Binary,
            13 => Self::List,
            14 => Self::Range,
            15 => Self::ArrayInt,
            16 => Self::ArrayInt64,
            17 => Self::ArrayFloat,
            18 => Self::Array,
            19 => Self::Map,
            20 => Self::Element,
            21 => Self::Type,
            22 => Self::Func,
            23 => Self::Any,
            24 => Self::Error,
            _ => panic!("corrupted Item: unknown tag ordinal"),
        }
    }

    /// Whether values of this tag are heap/arena-allocated containers.
    ///
    /// `TYPE` and `FUNC` are heap objects too even though they sit on the
    /// "value" side of the type-tag table; `ANY` never tags a concrete item
    /// (it is a type-registry marker only) and `ERROR` is a pure immediate
    /// despite sitting last in ordinal order - see spec §3.1/§3.2.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::List
                | Self::Range
                | Self::ArrayInt
                | Self::ArrayInt64
                | Self::ArrayFloat
                | Self::Array
                | Self::Map
                | Self::Element
                | Self::Type
                | Self::Func
        )
    }

    /// Whether values of this tag are pure immediates (payload IS the value).
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Null | Self::Undefined | Self::Error)
    }

    /// Whether values of this tag are boxed scalars living on the number stack.
    #[must_use]
    pub const fn is_boxed_scalar(self) -> bool {
        matches!(self, Self::Int64 | Self::Float | Self::Decimal | Self::DateTime)
    }

    /// Position of this tag in the numeric promotion ladder, if it is numeric.
    ///
    /// `INT ⊂ INT64 ⊂ FLOAT ⊂ DECIMAL`; higher rank wins when two numeric
    /// operands are combined.
    #[must_use]
    pub const fn numeric_rank(self) -> Option<u8> {
        match self {
            Self::Int => Some(0),
            Self::Int64 => Some(1),
            Self::Float => Some(2),
            Self::Decimal => Some(3),
            _ => None,
        }
    }
}
