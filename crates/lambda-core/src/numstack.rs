// SPDX-License-Identifier: Apache-2.0

//! The number stack: an append-only store for boxed scalars (`int64`,
//! `float`, `decimal`, `datetime`).
//!
//! Spec §4.5 warns that "payload pointers are invalidated if the number
//! stack reallocates". This implementation sidesteps that hazard by handing
//! back a [`StackSlot`] index rather than a raw pointer - growing the
//! backing `Vec` never invalidates an existing index, only a raw address.
//! The hazard is recorded as resolved in DESIGN.md rather than reproduced.

use crate::decimal::Decimal;
use crate::item::Item;
use crate::tag::Tag;

/// An index into one of [`NumberStack`]'s four typed arenas.
///
/// Packs into the low 56 bits of an [`crate::Item`] payload unchanged.
pub type StackSlot = u32;

/// Append-only storage for boxed scalars.
///
/// One `Vec` per boxed type keeps the common case (mostly-int64 workloads,
/// say) from wasting space on an enum tag per slot.
#[derive(Debug, Default)]
pub struct NumberStack {
    int64s: Vec<i64>,
    floats: Vec<f64>,
    decimals: Vec<Decimal>,
    datetimes: Vec<i64>,
}

impl NumberStack {
    /// Create an empty number stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a boxed `int64`, returning its slot.
    pub fn push_int64(&mut self, v: i64) -> StackSlot {
        self.int64s.push(v);
        (self.int64s.len() - 1) as StackSlot
    }

    /// Push a boxed `float`, returning its slot.
    pub fn push_float(&mut self, v: f64) -> StackSlot {
        self.floats.push(v);
        (self.floats.len() - 1) as StackSlot
    }

    /// Push a boxed `decimal`, returning its slot.
    pub fn push_decimal(&mut self, v: Decimal) -> StackSlot {
        self.decimals.push(v);
        (self.decimals.len() - 1) as StackSlot
    }

    /// Push a boxed `datetime` (Unix epoch nanoseconds), returning its slot.
    pub fn push_datetime(&mut self, v: i64) -> StackSlot {
        self.datetimes.push(v);
        (self.datetimes.len() - 1) as StackSlot
    }

    /// Read back a boxed `int64` by slot.
    #[must_use]
    pub fn int64(&self, slot: StackSlot) -> i64 {
        self.int64s[slot as usize]
    }

    /// Read back a boxed `float` by slot.
    #[must_use]
    pub fn float(&self, slot: StackSlot) -> f64 {
        self.floats[slot as usize]
    }

    /// Read back a boxed `decimal` by slot.
    #[must_use]
    pub fn decimal(&self, slot: StackSlot) -> &Decimal {
        &self.decimals[slot as usize]
    }

    /// Read back a boxed `datetime` by slot.
    #[must_use]
    pub fn datetime(&self, slot: StackSlot) -> i64 {
        self.datetimes[slot as usize]
    }

    /// Box a 64-bit integer and return its tagged `Item` (spec §4.1
    /// `box_int64`).
    pub fn box_int64(&mut self, v: i64) -> Item {
        Item::from_raw(Tag::Int64, u64::from(self.push_int64(v)))
    }

    /// Box a float and return its tagged `Item` (`box_float`).
    pub fn box_float(&mut self, v: f64) -> Item {
        Item::from_raw(Tag::Float, u64::from(self.push_float(v)))
    }

    /// Box a decimal and return its tagged `Item` (`box_decimal`).
    pub fn box_decimal(&mut self, v: Decimal) -> Item {
        Item::from_raw(Tag::Decimal, u64::from(self.push_decimal(v)))
    }

    /// Box a datetime (Unix epoch nanoseconds) and return its tagged `Item`
    /// (`box_datetime`).
    pub fn box_datetime(&mut self, v: i64) -> Item {
        Item::from_raw(Tag::DateTime, u64::from(self.push_datetime(v)))
    }

    /// Read back a boxed `int64` item (`unbox_int64`). Panics if `item` is
    /// not tagged `INT64` - that would be a code-generator bug, not a
    /// recoverable runtime condition.
    #[must_use]
    pub fn unbox_int64(&self, item: Item) -> i64 {
        assert_eq!(item.tag(), Tag::Int64, "unbox_int64 on non-INT64 item");
        self.int64(item.payload() as StackSlot)
    }

    /// Read back a boxed `float` item (`unbox_float`).
    #[must_use]
    pub fn unbox_float(&self, item: Item) -> f64 {
        assert_eq!(item.tag(), Tag::Float, "unbox_float on non-FLOAT item");
        self.float(item.payload() as StackSlot)
    }

    /// Read back a boxed `decimal` item.
    #[must_use]
    pub fn unbox_decimal(&self, item: Item) -> &Decimal {
        assert_eq!(item.tag(), Tag::Decimal, "unbox_decimal on non-DECIMAL item");
        self.decimal(item.payload() as StackSlot)
    }

    /// Read back a boxed `datetime` item.
    #[must_use]
    pub fn unbox_datetime(&self, item: Item) -> i64 {
        assert_eq!(item.tag(), Tag::DateTime, "unbox_datetime on non-DATETIME item");
        self.datetime(item.payload() as StackSlot)
    }

    /// Total number of boxed scalars currently stored, across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.int64s.len() + self.floats.len() + self.decimals.len() + self.datetimes.len()
    }

    /// Whether the stack holds no boxed scalars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod numstack_test {
    use super::NumberStack;

    #[test]
    fn slots_survive_growth() {
        let mut stack = NumberStack::new();
        let first = stack.push_int64(42);
        for i in 0..10_000 {
            stack.push_int64(i);
        }
        assert_eq!(stack.int64(first), 42);
    }

    #[test]
    fn box_unbox_round_trips() {
        let mut stack = NumberStack::new();
        let item = stack.box_int64(9_000_000_000);
        assert_eq!(stack.unbox_int64(item), 9_000_000_000);

        let item = stack.box_float(3.25);
        assert!((stack.unbox_float(item) - 3.25).abs() < f64::EPSILON);
    }

    #[test]
    fn each_type_has_its_own_slot_space() {
        let mut stack = NumberStack::new();
        let i = stack.push_int64(7);
        let f = stack.push_float(7.0);
        assert_eq!(i, 0);
        assert_eq!(f, 0);
        assert!((stack.float(f) - 7.0).abs() < f64::EPSILON);
        assert_eq!(stack.int64(i), 7);
    }
}
