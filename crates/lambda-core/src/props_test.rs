// SPDX-License-Identifier: Apache-2.0

//! Property tests for the universal invariants in spec §8:
//! `box(unbox(x)) == x` for every boxed scalar, and tag bits round-trip for
//! every `Item`.

#![cfg(test)]

use proptest::prelude::*;

use crate::item::Item;
use crate::numstack::NumberStack;
use crate::tag::Tag;

proptest! {
    #[test]
    fn int64_box_unbox_round_trips(v: i64) {
        let mut stack = NumberStack::new();
        let item = stack.box_int64(v);
        prop_assert_eq!(item.tag(), Tag::Int64);
        prop_assert_eq!(stack.unbox_int64(item), v);
    }

    #[test]
    fn float_box_unbox_round_trips(v: f64) {
        let mut stack = NumberStack::new();
        let item = stack.box_float(v);
        prop_assert_eq!(item.tag(), Tag::Float);
        let back = stack.unbox_float(item);
        prop_assert!(back.to_bits() == v.to_bits() || (back.is_nan() && v.is_nan()));
    }

    #[test]
    fn tag_bits_round_trip(raw in 0u8..=24u8, payload: u64) {
        let tag = Tag::from_u8(raw);
        let item = Item::from_raw(tag, payload);
        prop_assert_eq!(item.tag(), tag);
        prop_assert_eq!(item.payload(), payload & ((1u64 << 56) - 1));
    }

    #[test]
    fn int_round_trips_for_any_i32(v: i32) {
        prop_assert_eq!(Item::int(v).as_int(), Some(v));
    }
}
