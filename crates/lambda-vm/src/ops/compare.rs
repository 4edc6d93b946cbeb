// SPDX-License-Identifier: Apache-2.0

//! Tri-state comparisons and boolean logic (spec §4.1, §4.5).
//!
//! "Tri-state" means every comparison yields `TRUE`, `FALSE`, or `ERROR` -
//! never a Rust `bool` directly - so a comparison against an incomparable
//! pair (e.g. a string and a list) propagates `ERROR` instead of silently
//! picking an arbitrary ordering.

use lambda_core::{Item, Tag};

use super::Num;
use crate::Context;

fn numeric_cmp(ctx: &Context, a: Item, b: Item) -> Option<core::cmp::Ordering> {
    let (na, nb) = (Num::read(a, ctx)?, Num::read(b, ctx)?);
    na.as_f64().partial_cmp(&nb.as_f64())
}

fn text_of<'a>(ctx: &'a Context, item: Item) -> Option<&'a str> {
    match item.tag() {
        Tag::String | Tag::Symbol => {
            let handle = item.handle()?;
            match &ctx.heap.get(handle)?.kind {
                crate::container::ContainerKind::Text(s) => Some(s.as_str()),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Structural/value equality (`==`). Numeric operands compare across ranks
/// (`1 == 1.0` is true); text operands compare by content.
pub fn fn_eq(ctx: &Context, a: Item, b: Item) -> Item {
    if let Some(ord) = numeric_cmp(ctx, a, b) {
        return Item::bool(ord == core::cmp::Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (text_of(ctx, a), text_of(ctx, b)) {
        return Item::bool(x == y);
    }
    if a.tag() == Tag::Bool && b.tag() == Tag::Bool {
        return Item::bool(a.as_bool() == b.as_bool());
    }
    if matches!((a.tag(), b.tag()), (Tag::Null, Tag::Null) | (Tag::Undefined, Tag::Undefined)) {
        return Item::bool(true);
    }
    Item::ERROR
}

pub fn fn_ne(ctx: &Context, a: Item, b: Item) -> Item {
    let eq = fn_eq(ctx, a, b);
    if eq.is_error() {
        return Item::ERROR;
    }
    Item::bool(eq.as_bool() == Some(false))
}

macro_rules! ordering_cmp {
    ($name:ident, $ord:pat) => {
        pub fn $name(ctx: &Context, a: Item, b: Item) -> Item {
            match numeric_cmp(ctx, a, b) {
                Some($ord) => Item::bool(true),
                Some(_) => Item::bool(false),
                None => match (text_of(ctx, a), text_of(ctx, b)) {
                    (Some(x), Some(y)) => Item::bool(matches!(x.cmp(y), $ord)),
                    _ => Item::ERROR,
                },
            }
        }
    };
}

ordering_cmp!(fn_lt, core::cmp::Ordering::Less);
ordering_cmp!(fn_gt, core::cmp::Ordering::Greater);

pub fn fn_le(ctx: &Context, a: Item, b: Item) -> Item {
    let gt = fn_gt(ctx, a, b);
    if gt.is_error() {
        return Item::ERROR;
    }
    Item::bool(gt.as_bool() == Some(false))
}

pub fn fn_ge(ctx: &Context, a: Item, b: Item) -> Item {
    let lt = fn_lt(ctx, a, b);
    if lt.is_error() {
        return Item::ERROR;
    }
    Item::bool(lt.as_bool() == Some(false))
}

/// Logical NOT. Preserves `ERROR` (spec §4.1 `safe_b2it`) rather than
/// coercing an error operand into `true`.
pub fn fn_not(a: Item) -> Item {
    Item::safe_b2it(a.item_truthy().map(|b| !b))
}

/// Short-circuit-unaware logical AND: both operands are truthy-checked, and
/// the first `ERROR` encountered wins (tri-state propagation).
pub fn fn_and(a: Item, b: Item) -> Item {
    match (a.item_truthy(), b.item_truthy()) {
        (Err(e), _) => e,
        (_, Err(e)) => e,
        (Ok(x), Ok(y)) => Item::bool(x && y),
    }
}

pub fn fn_or(a: Item, b: Item) -> Item {
    match (a.item_truthy(), b.item_truthy()) {
        (Err(e), _) => e,
        (_, Err(e)) => e,
        (Ok(x), Ok(y)) => Item::bool(x || y),
    }
}

#[cfg(test)]
mod compare_test {
    use super::*;
    use crate::container::{Container, ContainerHeader, ContainerKind};

    #[test]
    fn cross_rank_numeric_equality() {
        let mut ctx = Context::default();
        let f = ctx.numbers.box_float(1.0);
        assert_eq!(fn_eq(&ctx, Item::int(1), f).as_bool(), Some(true));
    }

    #[test]
    fn incomparable_types_yield_error() {
        let mut ctx = Context::default();
        let s = ctx.heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::Text("x".into())));
        let r = fn_lt(&ctx, Item::int(1), s);
        assert!(r.is_error());
    }

    #[test]
    fn string_ordering_is_lexical() {
        let mut ctx = Context::default();
        let a = ctx.heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::Text("apple".into())));
        let b = ctx.heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::Text("banana".into())));
        assert_eq!(fn_lt(&ctx, a, b).as_bool(), Some(true));
    }

    #[test]
    fn not_preserves_error() {
        assert!(fn_not(Item::ERROR).is_error());
        assert_eq!(fn_not(Item::bool(false)).as_bool(), Some(true));
    }

    #[test]
    fn and_or_propagate_first_error() {
        assert!(fn_and(Item::ERROR, Item::bool(true)).is_error());
        assert!(fn_or(Item::bool(false), Item::ERROR).is_error());
        assert_eq!(fn_and(Item::bool(true), Item::bool(false)).as_bool(), Some(false));
        assert_eq!(fn_or(Item::bool(false), Item::bool(true)).as_bool(), Some(true));
    }
}
