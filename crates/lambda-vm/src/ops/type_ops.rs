// SPDX-License-Identifier: Apache-2.0

//! `fn_is`/`fn_in`/`fn_to` - type predicates, membership and conversion
//! (spec §4.5).

use lambda_core::{Item, Tag};

use super::Num;
use crate::container::ContainerKind;
use crate::Context;

/// `value is TYPE` - tag-based type test. `ANY` always matches; numeric
/// ranks match their own tag and nothing above it (spec: `is` checks the
/// concrete runtime tag, promotion does not apply).
#[must_use]
pub fn fn_is(value: Item, type_tag: Tag) -> Item {
    Item::bool(type_tag == Tag::Any || value.tag() == type_tag)
}

/// `needle in haystack` - container membership (list/array/range) or
/// substring test (string). `ERROR` if `haystack` isn't a container or text.
pub fn fn_in(ctx: &Context, needle: Item, haystack: Item) -> Item {
    match haystack.tag() {
        Tag::List | Tag::Array => {
            let Some(handle) = haystack.handle() else { return Item::ERROR };
            let Some(container) = ctx.heap.get(handle) else { return Item::ERROR };
            match &container.kind {
                ContainerKind::List(items) | ContainerKind::Array(items) => {
                    Item::bool(items.iter().any(|it| super::fn_eq(ctx, *it, needle).as_bool() == Some(true)))
                }
                _ => Item::ERROR,
            }
        }
        Tag::Range => {
            let Some(handle) = haystack.handle() else { return Item::ERROR };
            let Some(container) = ctx.heap.get(handle) else { return Item::ERROR };
            let (ContainerKind::Range { start, end }, Some(n)) = (&container.kind, needle.as_int()) else { return Item::ERROR };
            Item::bool((*start..*end).contains(&i64::from(n)))
        }
        Tag::String => {
            let (Some(hay), Some(nee)) = (text_of(ctx, haystack), text_of(ctx, needle)) else { return Item::ERROR };
            Item::bool(hay.contains(nee))
        }
        _ => Item::ERROR,
    }
}

fn text_of<'a>(ctx: &'a Context, item: Item) -> Option<&'a str> {
    let handle = item.handle()?;
    match &ctx.heap.get(handle)?.kind {
        ContainerKind::Text(s) => Some(s.as_str()),
        _ => None,
    }
}

/// `value to TYPE` - explicit conversion. Numeric conversions follow the
/// promotion ladder in both directions (narrowing a `decimal` to `int`
/// truncates); conversions with no defined rule are `ERROR`.
pub fn fn_to(ctx: &mut Context, value: Item, type_tag: Tag) -> Item {
    if value.tag() == type_tag {
        return value;
    }
    match type_tag {
        Tag::Int => Num::read(value, ctx).map_or(Item::ERROR, |n| Item::int(n.as_f64() as i32)),
        Tag::Int64 => Num::read(value, ctx).map_or(Item::ERROR, |n| ctx.numbers.box_int64(n.as_f64() as i64)),
        Tag::Float => Num::read(value, ctx).map_or(Item::ERROR, |n| ctx.numbers.box_float(n.as_f64())),
        Tag::Decimal => Num::read(value, ctx).map_or(Item::ERROR, |n| ctx.numbers.box_decimal(n.as_decimal())),
        Tag::String => to_string_item(ctx, value),
        Tag::Bool => value.item_truthy().map_or(Item::ERROR, Item::bool),
        _ => Item::ERROR,
    }
}

fn to_string_item(ctx: &mut Context, value: Item) -> Item {
    let rendered = match value.tag() {
        Tag::Int => value.as_int().map(|v| v.to_string()),
        Tag::Int64 => Some(ctx.numbers.unbox_int64(value).to_string()),
        Tag::Float => Some(ctx.numbers.unbox_float(value).to_string()),
        Tag::Decimal => Some(ctx.numbers.unbox_decimal(value).to_string()),
        Tag::Bool => value.as_bool().map(|b| b.to_string()),
        Tag::Null => Some("null".to_string()),
        Tag::Undefined => Some("undefined".to_string()),
        _ => None,
    };
    rendered.map_or(Item::ERROR, |text| {
        use crate::container::Container;
        use crate::memory::heap_header;
        ctx.heap.alloc(Container::new(heap_header(0), ContainerKind::Text(text)))
    })
}

#[cfg(test)]
mod type_ops_test {
    use super::*;
    use crate::container::{Container, ContainerHeader};

    #[test]
    fn is_matches_concrete_tag_only() {
        assert_eq!(fn_is(Item::int(1), Tag::Int).as_bool(), Some(true));
        assert_eq!(fn_is(Item::int(1), Tag::Float).as_bool(), Some(false));
        assert_eq!(fn_is(Item::int(1), Tag::Any).as_bool(), Some(true));
    }

    #[test]
    fn in_checks_list_membership() {
        let mut ctx = Context::default();
        let list = ctx.heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::List(vec![Item::int(1), Item::int(2)])));
        assert_eq!(fn_in(&ctx, Item::int(2), list).as_bool(), Some(true));
        assert_eq!(fn_in(&ctx, Item::int(9), list).as_bool(), Some(false));
    }

    #[test]
    fn in_checks_substring() {
        let mut ctx = Context::default();
        let hay = ctx.heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::Text("hello world".into())));
        let needle = ctx.heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::Text("world".into())));
        assert_eq!(fn_in(&ctx, needle, hay).as_bool(), Some(true));
    }

    #[test]
    fn to_int_truncates_float() {
        let mut ctx = Context::default();
        let f = ctx.numbers.box_float(3.9);
        assert_eq!(fn_to(&mut ctx, f, Tag::Int).as_int(), Some(3));
    }

    #[test]
    fn to_string_renders_int() {
        let mut ctx = Context::default();
        let s = fn_to(&mut ctx, Item::int(42), Tag::String);
        match &ctx.heap.get(s.handle().unwrap()).unwrap().kind {
            ContainerKind::Text(t) => assert_eq!(t, "42"),
            _ => panic!("expected text"),
        }
    }
}
