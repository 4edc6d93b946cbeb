// SPDX-License-Identifier: Apache-2.0

//! `fn_add`/`fn_sub`/`fn_mul`/`fn_div`/`fn_idiv`/`fn_mod`/`fn_pow` and the
//! unary/aggregate numeric builtins (spec §4.5).

use lambda_core::{Decimal, Item, Tag};

use super::{checked_int_op, promote, Num};
use crate::Context;

fn binary_numeric(ctx: &mut Context, a: Item, b: Item, combine: impl FnOnce(Num, Num) -> Option<Num>) -> Item {
    let (Some(na), Some(nb)) = (Num::read(a, ctx), Num::read(b, ctx)) else { return Item::ERROR };
    let (na, nb) = promote(na, nb);
    match combine(na, nb) {
        Some(result) => result.into_item(ctx),
        None => Item::ERROR,
    }
}

/// `+`: numeric addition, `null + null` (only), or element-wise addition of
/// two same-length lists/arrays (spec §4.1: "`null + x` → ERROR unless `x`
/// is null → NULL"; "`+` between container and container of compatible type
/// is element-wise"). Anything else that isn't a plain numeric pair falls
/// through to [`binary_numeric`]'s `ERROR` on a failed [`Num::read`].
pub fn fn_add(ctx: &mut Context, a: Item, b: Item) -> Item {
    if a.tag() == Tag::Null && b.tag() == Tag::Null {
        return Item::NULL;
    }
    if matches!((a.tag(), b.tag()), (Tag::List, Tag::List) | (Tag::Array, Tag::Array)) {
        return super::fn_add_array(ctx, a, b);
    }
    binary_numeric(ctx, a, b, |a, b| {
        Some(match (a, b) {
            (Num::Int(x), Num::Int(y)) => checked_int_op(x, y, i32::checked_add, Decimal::add),
            (Num::Int64(x), Num::Int64(y)) => Num::Int64(x.checked_add(y)?),
            (Num::Float(x), Num::Float(y)) => Num::Float(x + y),
            (Num::Decimal(x), Num::Decimal(y)) => Num::Decimal(x.add(&y)),
            _ => unreachable!("promote() equalizes ranks"),
        })
    })
}

pub fn fn_sub(ctx: &mut Context, a: Item, b: Item) -> Item {
    binary_numeric(ctx, a, b, |a, b| {
        Some(match (a, b) {
            (Num::Int(x), Num::Int(y)) => checked_int_op(x, y, i32::checked_sub, Decimal::sub),
            (Num::Int64(x), Num::Int64(y)) => Num::Int64(x.checked_sub(y)?),
            (Num::Float(x), Num::Float(y)) => Num::Float(x - y),
            (Num::Decimal(x), Num::Decimal(y)) => Num::Decimal(x.sub(&y)),
            _ => unreachable!("promote() equalizes ranks"),
        })
    })
}

pub fn fn_mul(ctx: &mut Context, a: Item, b: Item) -> Item {
    binary_numeric(ctx, a, b, |a, b| {
        Some(match (a, b) {
            (Num::Int(x), Num::Int(y)) => checked_int_op(x, y, i32::checked_mul, Decimal::mul),
            (Num::Int64(x), Num::Int64(y)) => Num::Int64(x.checked_mul(y)?),
            (Num::Float(x), Num::Float(y)) => Num::Float(x * y),
            (Num::Decimal(x), Num::Decimal(y)) => Num::Decimal(x.mul(&y)),
            _ => unreachable!("promote() equalizes ranks"),
        })
    })
}

/// Floating/decimal division (`/`); integer division by zero is an `ERROR`,
/// not a panic.
pub fn fn_div(ctx: &mut Context, a: Item, b: Item) -> Item {
    let decimal_ctx = ctx.decimal_ctx;
    binary_numeric(ctx, a, b, |a, b| match (a, b) {
        (Num::Int(x), Num::Int(y)) => {
            if y == 0 {
                None
            } else {
                Some(Num::Decimal(Decimal::from_i64(i64::from(x)).div(&Decimal::from_i64(i64::from(y)), &decimal_ctx)?))
            }
        }
        (Num::Int64(x), Num::Int64(y)) => {
            if y == 0 {
                None
            } else {
                Some(Num::Decimal(Decimal::from_i64(x).div(&Decimal::from_i64(y), &decimal_ctx)?))
            }
        }
        (Num::Float(x), Num::Float(y)) => Some(Num::Float(x / y)),
        (Num::Decimal(x), Num::Decimal(y)) => Some(Num::Decimal(x.div(&y, &decimal_ctx)?)),
        _ => unreachable!("promote() equalizes ranks"),
    })
}

/// Truncating integer division (`idiv`).
pub fn fn_idiv(ctx: &mut Context, a: Item, b: Item) -> Item {
    binary_numeric(ctx, a, b, |a, b| match (a, b) {
        (Num::Int(x), Num::Int(y)) => (y != 0).then(|| Num::Int(x.wrapping_div(y))),
        (Num::Int64(x), Num::Int64(y)) => (y != 0).then(|| Num::Int64(x.wrapping_div(y))),
        (Num::Float(x), Num::Float(y)) => Some(Num::Float((x / y).trunc())),
        (Num::Decimal(x), Num::Decimal(y)) => {
            let f = x.to_f64()? / y.to_f64()?;
            Some(Num::Decimal(Decimal::from_i64(f.trunc() as i64)))
        }
        _ => unreachable!("promote() equalizes ranks"),
    })
}

/// Modulo; result takes the sign of the divisor, matching the teacher's
/// integer-modulus convention.
pub fn fn_mod(ctx: &mut Context, a: Item, b: Item) -> Item {
    binary_numeric(ctx, a, b, |a, b| match (a, b) {
        (Num::Int(x), Num::Int(y)) => {
            if y == 0 {
                return None;
            }
            let rem = x.wrapping_rem(y);
            Some(Num::Int(if (rem < 0 && y > 0) || (rem > 0 && y < 0) { rem.wrapping_add(y) } else { rem }))
        }
        (Num::Int64(x), Num::Int64(y)) => {
            if y == 0 {
                return None;
            }
            let rem = x.wrapping_rem(y);
            Some(Num::Int64(if (rem < 0 && y > 0) || (rem > 0 && y < 0) { rem.wrapping_add(y) } else { rem }))
        }
        (Num::Float(x), Num::Float(y)) => Some(Num::Float(x.rem_euclid(y))),
        _ => None,
    })
}

pub fn fn_pow(ctx: &mut Context, base: Item, exp: Item) -> Item {
    binary_numeric(ctx, base, exp, |a, b| Some(Num::Float(a.as_f64().powf(b.as_f64()))))
}

pub fn fn_abs(ctx: &mut Context, a: Item) -> Item {
    let Some(n) = Num::read(a, ctx) else { return Item::ERROR };
    match n {
        // `i32::MIN.abs()` overflows `i32`; promote to `int64` rather than
        // panic or wrap (same overflow discipline as the binary ops above).
        Num::Int(v) => v.checked_abs().map_or_else(|| ctx.numbers.box_int64(i64::from(v).unsigned_abs() as i64), Item::int),
        Num::Int64(v) => ctx.numbers.box_int64(v.abs()),
        Num::Float(v) => ctx.numbers.box_float(v.abs()),
        Num::Decimal(d) => ctx.numbers.box_decimal(if d.is_negative() { Decimal::from_i64(0).sub(&d) } else { d }),
    }
}

pub fn fn_round(ctx: &mut Context, a: Item) -> Item {
    let Some(n) = Num::read(a, ctx) else { return Item::ERROR };
    ctx.numbers.box_float(n.as_f64().round())
}

pub fn fn_floor(ctx: &mut Context, a: Item) -> Item {
    let Some(n) = Num::read(a, ctx) else { return Item::ERROR };
    ctx.numbers.box_float(n.as_f64().floor())
}

pub fn fn_ceil(ctx: &mut Context, a: Item) -> Item {
    let Some(n) = Num::read(a, ctx) else { return Item::ERROR };
    ctx.numbers.box_float(n.as_f64().ceil())
}

pub fn fn_min(ctx: &mut Context, a: Item, b: Item) -> Item {
    binary_numeric(ctx, a, b, |a, b| Some(if a.as_f64() <= b.as_f64() { a } else { b }))
}

pub fn fn_max(ctx: &mut Context, a: Item, b: Item) -> Item {
    binary_numeric(ctx, a, b, |a, b| Some(if a.as_f64() >= b.as_f64() { a } else { b }))
}

/// Sum of a slice of numeric items, starting from `0`; `ERROR` if any
/// element isn't numeric.
pub fn fn_sum(ctx: &mut Context, items: &[Item]) -> Item {
    let mut acc = Item::int(0);
    for item in items {
        acc = fn_add(ctx, acc, *item);
        if acc.is_error() {
            return Item::ERROR;
        }
    }
    acc
}

/// Arithmetic mean; `ERROR` on an empty slice (division by zero) or a
/// non-numeric element.
pub fn fn_avg(ctx: &mut Context, items: &[Item]) -> Item {
    if items.is_empty() {
        return Item::ERROR;
    }
    let sum = fn_sum(ctx, items);
    if sum.is_error() {
        return Item::ERROR;
    }
    fn_div(ctx, sum, Item::int(items.len() as i32))
}
