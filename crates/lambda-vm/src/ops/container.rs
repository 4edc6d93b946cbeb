// SPDX-License-Identifier: Apache-2.0

//! Container constructors, `*_fill` variants, and `fn_index`/`fn_member`/
//! `fn_len` (spec §4.5).

use lambda_core::{Item, Tag};

use crate::container::{Container, ContainerKind};
use crate::memory::heap_header;
use crate::Context;

fn alloc(ctx: &mut Context, kind: ContainerKind) -> Item {
    ctx.heap.alloc(Container::new(heap_header(0), kind))
}

/// `list(a, b, c, ...)`.
pub fn fn_list(ctx: &mut Context, items: Vec<Item>) -> Item {
    alloc(ctx, ContainerKind::List(items))
}

/// `array(a, b, c, ...)`.
pub fn fn_array(ctx: &mut Context, items: Vec<Item>) -> Item {
    alloc(ctx, ContainerKind::Array(items))
}

/// `list_fill(n, value)` - an `n`-element list where every slot is `value`
/// (heap-shared: `value`'s ref count is bumped once per occurrence so each
/// slot is an independent owning reference).
pub fn fn_list_fill(ctx: &mut Context, n: usize, value: Item) -> Item {
    if value.tag().is_container() {
        if let Some(handle) = value.handle() {
            for _ in 0..n {
                ctx.heap.retain(handle);
            }
            // The caller's own reference counts as one of the `n` shares;
            // undo the extra retain so the total matches exactly `n` owners.
            if n > 0 {
                ctx.heap.dec_ref_and_maybe_collect(handle);
            }
        }
    }
    alloc(ctx, ContainerKind::List(vec![value; n]))
}

pub fn fn_array_fill(ctx: &mut Context, n: usize, value: Item) -> Item {
    fn_list_fill(ctx, n, value)
}

pub fn fn_map(ctx: &mut Context, entries: Vec<(Item, Item)>) -> Item {
    alloc(ctx, ContainerKind::Map(entries))
}

pub fn fn_element(ctx: &mut Context, tag_name: Item, attrs: Vec<(Item, Item)>, children: Vec<Item>) -> Item {
    alloc(ctx, ContainerKind::Element { tag_name, attrs, children })
}

pub fn fn_range(ctx: &mut Context, start: i64, end: i64) -> Item {
    alloc(ctx, ContainerKind::Range { start, end })
}

/// `a ++ b` for two lists or two arrays - a fresh container holding both
/// operands' items back to back. The result is a brand new allocation (its
/// own freshly-owned `Vec<Item>`), never a view into either operand, so
/// freeing `a`, `b`, and the concatenation result independently is always
/// safe (spec §8 scenario 6).
pub fn fn_concat_list(ctx: &mut Context, a: Item, b: Item) -> Item {
    let (Some(ah), Some(bh)) = (a.handle(), b.handle()) else { return Item::ERROR };
    let (Some(ac), Some(bc)) = (ctx.heap.get(ah), ctx.heap.get(bh)) else { return Item::ERROR };
    let kind = match (&ac.kind, &bc.kind) {
        (ContainerKind::List(x), ContainerKind::List(y)) => ContainerKind::List(x.iter().chain(y).copied().collect()),
        (ContainerKind::Array(x), ContainerKind::Array(y)) => ContainerKind::Array(x.iter().chain(y).copied().collect()),
        _ => return Item::ERROR,
    };
    for item in kind.child_items() {
        if let Some(h) = item.handle() {
            ctx.heap.retain(h);
        }
    }
    alloc(ctx, kind)
}

/// `a + b` for two lists or two arrays of the same length - element-wise
/// addition, slot by slot (spec §4.1: "`+` between container and container
/// of compatible type is element-wise (array add)"), distinct from
/// [`fn_concat_list`]'s `++` concatenation. Mismatched container kinds,
/// mismatched lengths, or any element pair [`super::fn_add`] can't combine
/// all collapse to `ERROR`.
pub fn fn_add_array(ctx: &mut Context, a: Item, b: Item) -> Item {
    let (Some(ah), Some(bh)) = (a.handle(), b.handle()) else { return Item::ERROR };
    let (Some(ac), Some(bc)) = (ctx.heap.get(ah), ctx.heap.get(bh)) else { return Item::ERROR };
    let (xs, ys, is_list) = match (&ac.kind, &bc.kind) {
        (ContainerKind::List(x), ContainerKind::List(y)) => (x.clone(), y.clone(), true),
        (ContainerKind::Array(x), ContainerKind::Array(y)) => (x.clone(), y.clone(), false),
        _ => return Item::ERROR,
    };
    if xs.len() != ys.len() {
        return Item::ERROR;
    }

    let mut summed = Vec::with_capacity(xs.len());
    for (x, y) in xs.into_iter().zip(ys) {
        let sum = super::fn_add(ctx, x, y);
        if sum.is_error() {
            return Item::ERROR;
        }
        summed.push(sum);
    }
    for item in &summed {
        if item.tag().is_container() {
            if let Some(h) = item.handle() {
                ctx.heap.retain(h);
            }
        }
    }
    alloc(ctx, if is_list { ContainerKind::List(summed) } else { ContainerKind::Array(summed) })
}

/// `container[index]` - positional for list/array/range, key lookup for
/// map. `ERROR` on an out-of-range index or an unindexable type.
pub fn fn_index(ctx: &Context, container: Item, index: Item) -> Item {
    let Some(handle) = container.handle() else { return Item::ERROR };
    let Some(c) = ctx.heap.get(handle) else { return Item::ERROR };
    match &c.kind {
        ContainerKind::List(items) | ContainerKind::Array(items) => {
            let Some(i) = index.as_int() else { return Item::ERROR };
            usize::try_from(i).ok().and_then(|i| items.get(i).copied()).unwrap_or(Item::ERROR)
        }
        ContainerKind::ArrayInt(items) => index.as_int().and_then(|i| usize::try_from(i).ok()).and_then(|i| items.get(i)).map_or(Item::ERROR, |v| Item::int(*v)),
        ContainerKind::Map(entries) => entries
            .iter()
            .find(|(k, _)| super::fn_eq(ctx, *k, index).as_bool() == Some(true))
            .map_or(Item::UNDEFINED, |(_, v)| *v),
        ContainerKind::Range { start, end } => {
            let Some(i) = index.as_int() else { return Item::ERROR };
            let value = start + i64::from(i);
            if value < *start || value >= *end {
                Item::ERROR
            } else {
                ctx_box_range_value(value)
            }
        }
        _ => Item::ERROR,
    }
}

fn ctx_box_range_value(v: i64) -> Item {
    // Range elements are plain `int`s when they fit, never allocated.
    i32::try_from(v).map_or(Item::ERROR, Item::int)
}

/// `key in container` for maps specifically - key presence rather than
/// value membership (distinguished from [`super::fn_in`], which tests
/// element membership for lists/arrays/ranges and substrings for text).
pub fn fn_member(ctx: &Context, container: Item, key: Item) -> Item {
    if container.tag() != Tag::Map {
        return Item::ERROR;
    }
    let Some(handle) = container.handle() else { return Item::ERROR };
    let Some(c) = ctx.heap.get(handle) else { return Item::ERROR };
    let ContainerKind::Map(entries) = &c.kind else { return Item::ERROR };
    Item::bool(entries.iter().any(|(k, _)| super::fn_eq(ctx, *k, key).as_bool() == Some(true)))
}

/// `len(container)` - logical length (spec §4.5; delegates to
/// [`ContainerKind::len`]).
pub fn fn_len(ctx: &Context, container: Item) -> Item {
    let Some(handle) = container.handle() else { return Item::ERROR };
    let Some(c) = ctx.heap.get(handle) else { return Item::ERROR };
    i32::try_from(c.kind.len()).map_or(Item::ERROR, Item::int)
}
