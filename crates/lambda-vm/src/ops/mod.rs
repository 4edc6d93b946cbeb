// SPDX-License-Identifier: Apache-2.0

//! The builtin operator library (spec §4.5): arithmetic, comparisons,
//! boolean logic, type predicates/conversion, string and container
//! operations, and IO primitives. Every function here takes the
//! [`crate::Context`] that owns the number stack/heap a boxed result lives
//! on, and returns `ERROR` rather than panicking on a runtime failure -
//! mirroring spec §4.1's "ERROR propagates, never throws" contract.

pub mod arithmetic;
pub mod compare;
pub mod container;
pub mod io;
pub mod string;
pub mod type_ops;

pub use arithmetic::*;
pub use compare::*;
pub use container::*;
pub use io::*;
pub use string::*;
pub use type_ops::*;

use lambda_core::{Decimal, Item, Tag};

/// A numeric operand after unboxing, at whatever rank it was tagged with.
/// Arithmetic ops promote a pair of these to the higher rank before
/// combining (spec §4.1: `INT ⊂ INT64 ⊂ FLOAT ⊂ DECIMAL`).
#[derive(Clone, Debug)]
pub(crate) enum Num {
    Int(i32),
    Int64(i64),
    Float(f64),
    Decimal(Decimal),
}

impl Num {
    pub(crate) fn read(item: Item, ctx: &crate::Context) -> Option<Self> {
        match item.tag() {
            Tag::Int => item.as_int().map(Self::Int),
            Tag::Int64 => Some(Self::Int64(ctx.numbers.unbox_int64(item))),
            Tag::Float => Some(Self::Float(ctx.numbers.unbox_float(item))),
            Tag::Decimal => Some(Self::Decimal(ctx.numbers.unbox_decimal(item).clone())),
            _ => None,
        }
    }

    pub(crate) const fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Int64(_) => 1,
            Self::Float(_) => 2,
            Self::Decimal(_) => 3,
        }
    }

    pub(crate) fn as_decimal(&self) -> Decimal {
        match self {
            Self::Int(v) => Decimal::from_i64(i64::from(*v)),
            Self::Int64(v) => Decimal::from_i64(*v),
            Self::Float(v) => Decimal::parse(&format!("{v}")).unwrap_or_else(|| Decimal::from_i64(*v as i64)),
            Self::Decimal(d) => d.clone(),
        }
    }

    pub(crate) fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => f64::from(*v),
            Self::Int64(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Decimal(d) => d.to_f64().unwrap_or(0.0),
        }
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Box this value back into an [`Item`] at its own rank.
    pub(crate) fn into_item(self, ctx: &mut crate::Context) -> Item {
        match self {
            Self::Int(v) => Item::int(v),
            Self::Int64(v) => ctx.numbers.box_int64(v),
            Self::Float(v) => ctx.numbers.box_float(v),
            Self::Decimal(d) => ctx.numbers.box_decimal(d),
        }
    }
}

/// Promote `a` and `b` to the higher of their two ranks, re-expressing both
/// at that rank.
pub(crate) fn promote(a: Num, b: Num) -> (Num, Num) {
    let target = a.rank().max(b.rank());
    (promote_to(a, target), promote_to(b, target))
}

fn promote_to(n: Num, target: u8) -> Num {
    if n.rank() >= target {
        return n;
    }
    match target {
        1 => Num::Int64(n.as_i64().unwrap_or_else(|| n.as_f64() as i64)),
        2 => Num::Float(n.as_f64()),
        3 => Num::Decimal(n.as_decimal()),
        _ => n,
    }
}

/// A 32-bit `int` op that overflows into `DECIMAL` instead of wrapping or
/// panicking (spec §4.1, §8: `INT32_MAX + 1` promotes to an equal-value
/// `DECIMAL`). `checked` attempts the fast path; `exact` recomputes the same
/// operation at full precision for the fallback.
pub(crate) fn checked_int_op(
    a: i32,
    b: i32,
    checked: fn(i32, i32) -> Option<i32>,
    exact: fn(&Decimal, &Decimal) -> Decimal,
) -> Num {
    checked(a, b).map_or_else(|| Num::Decimal(exact(&Decimal::from_i64(i64::from(a)), &Decimal::from_i64(i64::from(b)))), Num::Int)
}
