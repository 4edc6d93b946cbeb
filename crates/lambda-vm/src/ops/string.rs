// SPDX-License-Identifier: Apache-2.0

//! String builtins (spec §4.5): concatenation, case conversion, slicing.

use lambda_core::{Item, Tag};
use unicode_normalization::UnicodeNormalization;

use crate::container::{Container, ContainerKind};
use crate::memory::heap_header;
use crate::Context;

fn as_text<'a>(ctx: &'a Context, item: Item) -> Option<&'a str> {
    if !matches!(item.tag(), Tag::String | Tag::Symbol) {
        return None;
    }
    match &ctx.heap.get(item.handle()?)?.kind {
        ContainerKind::Text(s) => Some(s.as_str()),
        _ => None,
    }
}

fn alloc_string(ctx: &mut Context, s: String) -> Item {
    ctx.heap.alloc(Container::new(heap_header(0), ContainerKind::Text(s)))
}

pub fn fn_concat(ctx: &mut Context, a: Item, b: Item) -> Item {
    let (Some(x), Some(y)) = (as_text(ctx, a), as_text(ctx, b)) else { return Item::ERROR };
    let joined = format!("{x}{y}");
    alloc_string(ctx, joined)
}

pub fn fn_upper(ctx: &mut Context, a: Item) -> Item {
    let Some(x) = as_text(ctx, a) else { return Item::ERROR };
    let upper = x.to_uppercase();
    alloc_string(ctx, upper)
}

pub fn fn_lower(ctx: &mut Context, a: Item) -> Item {
    let Some(x) = as_text(ctx, a) else { return Item::ERROR };
    let lower = x.to_lowercase();
    alloc_string(ctx, lower)
}

pub fn fn_trim(ctx: &mut Context, a: Item) -> Item {
    let Some(x) = as_text(ctx, a) else { return Item::ERROR };
    let trimmed = x.trim().to_string();
    alloc_string(ctx, trimmed)
}

/// Character-index slice `[start, end)`, clamped to the string's length
/// rather than erroring on an out-of-range end (matches container slicing
/// conventions elsewhere in spec §4.5).
pub fn fn_slice(ctx: &mut Context, a: Item, start: i32, end: i32) -> Item {
    let Some(x) = as_text(ctx, a) else { return Item::ERROR };
    if start < 0 || end < start {
        return Item::ERROR;
    }
    let chars: Vec<char> = x.chars().collect();
    let start = (start as usize).min(chars.len());
    let end = (end as usize).min(chars.len());
    let sliced: String = chars[start..end].iter().collect();
    alloc_string(ctx, sliced)
}

/// `fn_contains(haystack, needle)` - substring containment, the dedicated
/// string-family name for the text case of [`super::fn_in`]'s generic
/// membership check (spec §4.5 names `fn_strcat/normalize/substring/
/// contains` as the string op family; `fn_in` stays the general-purpose
/// container/text membership test, `fn_contains` the string-specific one).
pub fn fn_contains(ctx: &Context, haystack: Item, needle: Item) -> Item {
    let (Some(hay), Some(needle)) = (as_text(ctx, haystack), as_text(ctx, needle)) else { return Item::ERROR };
    Item::bool(hay.contains(needle))
}

/// `fn_normalize(s)` - Unicode canonical composition (NFC), the same default
/// most scripting-language runtimes pick for a string `normalize()` builtin.
pub fn fn_normalize(ctx: &mut Context, a: Item) -> Item {
    let Some(x) = as_text(ctx, a) else { return Item::ERROR };
    let composed: String = x.nfc().collect();
    alloc_string(ctx, composed)
}

#[cfg(test)]
mod string_test {
    use super::*;

    fn text(ctx: &mut Context, s: &str) -> Item {
        alloc_string(ctx, s.to_string())
    }

    #[test]
    fn concat_joins_two_strings() {
        let mut ctx = Context::default();
        let a = text(&mut ctx, "foo");
        let b = text(&mut ctx, "bar");
        let r = fn_concat(&mut ctx, a, b);
        assert_eq!(as_text(&ctx, r), Some("foobar"));
    }

    #[test]
    fn concat_non_double_frees_inline_buffers() {
        // Both inputs stay separately owned after concat - the result is a
        // brand new allocation, not a re-tagged view into either operand -
        // so freeing all three independently must not double-free anything.
        let mut ctx = Context::default();
        let a = text(&mut ctx, "foo");
        let b = text(&mut ctx, "bar");
        let r = fn_concat(&mut ctx, a, b);
        crate::memory::free_item(&mut ctx.heap, a);
        crate::memory::free_item(&mut ctx.heap, b);
        crate::memory::free_item(&mut ctx.heap, r);
        assert!(ctx.heap_is_clean());
    }

    #[test]
    fn upper_lower_round_trip() {
        let mut ctx = Context::default();
        let a = text(&mut ctx, "MixedCase");
        let upper = fn_upper(&mut ctx, a);
        assert_eq!(as_text(&ctx, upper), Some("MIXEDCASE"));
        let lower = fn_lower(&mut ctx, a);
        assert_eq!(as_text(&ctx, lower), Some("mixedcase"));
    }

    #[test]
    fn slice_clamps_out_of_range_end() {
        let mut ctx = Context::default();
        let a = text(&mut ctx, "hello");
        let r = fn_slice(&mut ctx, a, 1, 100);
        assert_eq!(as_text(&ctx, r), Some("ello"));
    }

    #[test]
    fn slice_rejects_negative_start() {
        let mut ctx = Context::default();
        let a = text(&mut ctx, "hello");
        assert!(fn_slice(&mut ctx, a, -1, 2).is_error());
    }

    #[test]
    fn contains_checks_substring_presence() {
        let mut ctx = Context::default();
        let hay = text(&mut ctx, "hello world");
        let hit = text(&mut ctx, "world");
        let miss = text(&mut ctx, "xyz");
        assert_eq!(fn_contains(&ctx, hay, hit).as_bool(), Some(true));
        assert_eq!(fn_contains(&ctx, hay, miss).as_bool(), Some(false));
    }

    #[test]
    fn normalize_composes_combining_marks_to_nfc() {
        let mut ctx = Context::default();
        // "e" + COMBINING ACUTE ACCENT (NFD) composes to "é" as one codepoint (NFC).
        let decomposed = text(&mut ctx, "e\u{0301}");
        let normalized = fn_normalize(&mut ctx, decomposed);
        assert_eq!(as_text(&ctx, normalized), Some("\u{e9}"));
    }
}
