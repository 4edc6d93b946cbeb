// SPDX-License-Identifier: Apache-2.0

//! The universal 64-bit tagged value (spec §3.1).

use crate::tag::Tag;

const TAG_SHIFT: u32 = 56;
const PAYLOAD_MASK: u64 = (1u64 << TAG_SHIFT) - 1;

/// A single Lambda runtime value: an 8-bit [`Tag`] in the high byte, a
/// 56-bit payload in the rest.
///
/// For immediates the payload *is* the value (sign-extended as needed by the
/// accessor). For boxed scalars and containers the payload is an opaque
/// handle - a [`crate::numstack::StackSlot`] or a heap/arena index owned by
/// the runtime context, never a raw pointer (see crate docs).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item(u64);

impl Item {
    /// Build an item from a tag and a raw 56-bit payload. Extra high bits of
    /// `payload` are silently truncated.
    #[must_use]
    pub const fn from_raw(tag: Tag, payload: u64) -> Self {
        Self(((tag as u64) << TAG_SHIFT) | (payload & PAYLOAD_MASK))
    }

    #[must_use]
    pub const fn tag(self) -> Tag {
        Tag::from_u8((self.0 >> TAG_SHIFT) as u8)
    }

    #[must_use]
    pub const fn payload(self) -> u64 {
        self.0 & PAYLOAD_MASK
    }

    /// The canonical `null` item.
    pub const NULL: Self = Self::from_raw(Tag::Null, 0);
    /// The canonical `undefined` item.
    pub const UNDEFINED: Self = Self::from_raw(Tag::Undefined, 0);
    /// The canonical `ERROR` sentinel - never thrown, always tested for.
    pub const ERROR: Self = Self::from_raw(Tag::Error, 0);

    #[must_use]
    pub const fn bool(b: bool) -> Self {
        Self::from_raw(Tag::Bool, b as u64)
    }

    /// A 32-bit immediate integer. Callers that might overflow 32 bits must
    /// promote to `DECIMAL` first (spec §4.1) - this constructor truncates.
    #[must_use]
    pub const fn int(v: i32) -> Self {
        Self::from_raw(Tag::Int, (v as u32) as u64)
    }

    #[must_use]
    pub const fn is_null(self) -> bool {
        matches!(self.tag(), Tag::Null)
    }

    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self.tag(), Tag::Undefined)
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self.tag(), Tag::Error)
    }

    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self.tag() {
            Tag::Bool => Some(self.payload() != 0),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(self) -> Option<i32> {
        match self.tag() {
            Tag::Int => Some(self.payload() as u32 as i32),
            _ => None,
        }
    }

    /// A handle into a heap/arena/number-stack table, if this item carries one.
    #[must_use]
    pub const fn handle(self) -> Option<u32> {
        if self.tag().is_container() || self.tag().is_boxed_scalar() || matches!(self.tag(), Tag::Symbol | Tag::String | Tag::Binary) {
            Some(self.payload() as u32)
        } else {
            None
        }
    }

    /// JS-style truthiness with explicit error propagation (spec §4.1).
    ///
    /// `null`, `undefined`, `false`, integer `0` and the empty string/binary
    /// handle (payload `0`, which this crate cannot itself distinguish from
    /// a non-empty container at slot 0 - callers with heap access should
    /// prefer a container-aware truthiness check) are falsy; `ERROR` is
    /// neither - it propagates.
    pub const fn item_truthy(self) -> Result<bool, Self> {
        match self.tag() {
            Tag::Error => Err(self),
            Tag::Null | Tag::Undefined => Ok(false),
            Tag::Bool => Ok(self.payload() != 0),
            Tag::Int => Ok(self.payload() as u32 as i32 != 0),
            _ => Ok(true),
        }
    }

    /// Convert a `bool`-producing computation back into an `Item`, but
    /// preserve `ERROR` instead of coercing it to `false` (spec §4.1:
    /// "preserves ERROR tag when boolean conversion would mask it").
    #[must_use]
    pub fn safe_b2it(result: Result<bool, Self>) -> Self {
        match result {
            Ok(b) => Self::bool(b),
            Err(err) => err,
        }
    }
}

impl core::fmt::Debug for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.tag() {
            Tag::Null => write!(f, "null"),
            Tag::Undefined => write!(f, "undefined"),
            Tag::Error => write!(f, "ERROR"),
            Tag::Bool => write!(f, "{}", self.payload() != 0),
            Tag::Int => write!(f, "{}", self.payload() as u32 as i32),
            tag => write!(f, "Item({tag:?}, #{})", self.payload()),
        }
    }
}
