// SPDX-License-Identifier: Apache-2.0

//! Append-only, bulk-freed storage (spec §4.2 "Arena").
//!
//! Input-parsing collaborators (out of scope per `SPEC_FULL.md` §8) build an
//! entire parsed document - every container and string in it - inside one
//! `Arena`. The whole thing is freed in a single operation when the arena is
//! dropped; individual containers never participate in ref-counting.

use crate::container::Container;
use crate::{Item, Tag};

/// A slot index into an arena's backing table.
pub type ArenaHandle = u32;

/// A bulk-freed allocation region.
///
/// `is_heap` on every container placed here is `false` by construction -
/// see [`Arena::alloc`].
#[derive(Default)]
pub struct Arena {
    slots: Vec<Container>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a container in this arena. Always sets `is_heap = false`;
    /// `ref_cnt` is left at whatever the caller passed in (spec: ref-count
    /// operations are no-ops on arena containers, so nothing reads it).
    pub fn alloc(&mut self, mut container: Container) -> Item {
        container.header.is_heap = false;
        let tag = container_tag(&container.kind);
        let handle = self.slots.len() as ArenaHandle;
        self.slots.push(container);
        Item::from_raw(tag, u64::from(handle))
    }

    #[must_use]
    pub fn get(&self, handle: ArenaHandle) -> Option<&Container> {
        self.slots.get(handle as usize)
    }

    /// Number of containers currently held by this arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn container_tag(kind: &crate::container::ContainerKind) -> Tag {
    use crate::container::ContainerKind as K;
    match kind {
        K::List(_) => Tag::List,
        K::Array(_) => Tag::Array,
        K::ArrayInt(_) => Tag::ArrayInt,
        K::ArrayInt64(_) => Tag::ArrayInt64,
        K::ArrayFloat(_) => Tag::ArrayFloat,
        K::Map(_) => Tag::Map,
        K::Element { .. } => Tag::Element,
        K::Range { .. } => Tag::Range,
        K::Text(_) => Tag::String,
        K::Binary(_) => Tag::Binary,
    }
}
