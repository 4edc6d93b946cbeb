// SPDX-License-Identifier: Apache-2.0

//! IO builtins (spec §4.5): `fn_input`, `fn_format`, `fn_print`,
//! `fn_datetime`.

use std::io::{self, BufRead, Write};

use lambda_core::{Item, Tag};
use time::OffsetDateTime;

use crate::container::{Container, ContainerKind};
use crate::memory::heap_header;
use crate::Context;

fn alloc_string(ctx: &mut Context, s: String) -> Item {
    ctx.heap.alloc(Container::new(heap_header(0), ContainerKind::Text(s)))
}

/// Read one line from stdin, trimming the trailing newline. `ERROR` on EOF
/// or an IO failure rather than panicking - a script reading past end of
/// input should be able to handle it, not crash the runtime.
pub fn fn_input(ctx: &mut Context) -> Item {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => Item::ERROR,
        Ok(_) => {
            let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
            alloc_string(ctx, trimmed)
        }
        Err(_) => Item::ERROR,
    }
}

/// Render an item as display text - the same conversion `to string` uses,
/// but also recurses into containers shallowly for a readable one-line
/// summary.
pub fn fn_format(ctx: &Context, item: Item) -> String {
    match item.tag() {
        Tag::Null => "null".to_string(),
        Tag::Undefined => "undefined".to_string(),
        Tag::Error => "ERROR".to_string(),
        Tag::Bool => item.as_bool().unwrap_or(false).to_string(),
        Tag::Int => item.as_int().unwrap_or(0).to_string(),
        Tag::Int64 => ctx.numbers.unbox_int64(item).to_string(),
        Tag::Float => ctx.numbers.unbox_float(item).to_string(),
        Tag::Decimal => ctx.numbers.unbox_decimal(item).to_string(),
        Tag::String | Tag::Symbol => item
            .handle()
            .and_then(|h| ctx.heap.get(h))
            .and_then(|c| match &c.kind {
                ContainerKind::Text(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_default(),
        Tag::List | Tag::Array => item
            .handle()
            .and_then(|h| ctx.heap.get(h))
            .map(|c| {
                let items: Vec<String> = match &c.kind {
                    ContainerKind::List(v) | ContainerKind::Array(v) => v.iter().map(|it| fn_format(ctx, *it)).collect(),
                    _ => Vec::new(),
                };
                format!("[{}]", items.join(", "))
            })
            .unwrap_or_default(),
        _ => format!("<{:?}>", item.tag()),
    }
}

/// Write `fn_format(item)` followed by a newline to stdout.
pub fn fn_print(ctx: &Context, item: Item) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", fn_format(ctx, item));
}

/// Current wall-clock time as a boxed `DATETIME` item (Unix epoch
/// nanoseconds), via the `time` crate (spec §4.5's `fn_datetime` - `lona-vm`
/// is `no_std` and has no equivalent, so this follows the wider example
/// pack's choice of `time` for wall-clock values in a `std` runtime).
pub fn fn_datetime_now(ctx: &mut Context) -> Item {
    let now = OffsetDateTime::now_utc();
    let nanos = now.unix_timestamp_nanos();
    ctx.numbers.box_datetime(i64::try_from(nanos).unwrap_or(i64::MAX))
}
