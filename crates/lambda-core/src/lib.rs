// SPDX-License-Identifier: Apache-2.0

//! Foundational types for the Lambda runtime.
//!
//! This crate has no knowledge of heaps, scripts or the module graph - it
//! only defines the 64-bit tagged [`Item`] representation shared by every
//! other crate in the workspace, the numeric promotion ladder
//! `INT ⊂ INT64 ⊂ FLOAT ⊂ DECIMAL`, and the append-only [`NumberStack`] that
//! boxed scalars live behind.

pub mod decimal;
pub mod item;
pub mod numstack;
pub mod tag;

#[cfg(test)]
mod props_test;

pub use decimal::{Decimal, DecimalContext};
pub use item::Item;
pub use numstack::{NumberStack, StackSlot};
pub use tag::Tag;
