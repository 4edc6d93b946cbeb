// SPDX-License-Identifier: Apache-2.0

//! Individually allocated, reference-counted storage (spec §4.2 "Heap").
//!
//! Containers produced by running code - as opposed to containers a parser
//! builds in one shot inside an [`super::Arena`] - live here. Each slot is
//! tracked individually so `free_container` can collect it the instant its
//! `ref_cnt` hits zero.

use std::collections::HashSet;

use crate::container::{Container, ContainerHeader};
use crate::{Item, Tag};

/// A slot index into the heap's backing table. Packs into an [`Item`]
/// payload unchanged (see `crate::container` and `lambda_core::item`).
pub type HeapHandle = u32;

enum Slot {
    Live(Container),
    Freed,
}

/// The process-wide, individually-allocated, ref-counted heap.
///
/// `heap_calloc` (spec §4.2) is [`Heap::alloc`]: it sets `is_heap = true`,
/// `ref_cnt = 1` (the handle returned to the caller counts as the first
/// owner) and tracks the slot for leak detection.
#[derive(Default)]
pub struct Heap {
    slots: Vec<Slot>,
    live: HashSet<HeapHandle>,
}

impl Heap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new heap container, returning the `Item` handle to it.
    ///
    /// The item's tag is inferred from the container's kind; for a `Text`
    /// container that should be tagged `SYMBOL` rather than the default
    /// `STRING`, use [`Heap::alloc_as`] instead.
    pub fn alloc(&mut self, container: Container) -> Item {
        let tag = container_tag(&container.kind);
        self.alloc_as(tag, container)
    }

    /// Allocate a new heap container under an explicit tag - needed because
    /// `SYMBOL` and `STRING` share the same `Text` container kind (spec
    /// §3.1) and are distinguished only by the item's tag, not its payload.
    pub fn alloc_as(&mut self, tag: Tag, mut container: Container) -> Item {
        container.header.is_heap = true;
        if container.header.ref_cnt == 0 {
            container.header.ref_cnt = 1;
        }
        let handle = self.slots.len() as HeapHandle;
        self.slots.push(Slot::Live(container));
        self.live.insert(handle);
        Item::from_raw(tag, u64::from(handle))
    }

    /// Whether a handle still refers to a live container (used for leak
    /// detection in tests and by the frame-end discipline).
    #[must_use]
    pub fn contains(&self, handle: HeapHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Number of live (not-yet-collected) heap containers. A non-zero value
    /// after the top-level frame and `Context` are torn down indicates a
    /// reference-counting leak.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Whether `handle`'s container is heap-owned (`true`) or would be an
    /// arena container if it existed here at all (`None` for an unknown
    /// handle - arena-allocated items never show up in this table).
    #[must_use]
    pub fn is_heap_handle(&self, handle: HeapHandle) -> Option<bool> {
        match self.slots.get(handle as usize)? {
            Slot::Live(c) => Some(c.header.is_heap),
            Slot::Freed => None,
        }
    }

    #[must_use]
    pub fn get(&self, handle: HeapHandle) -> Option<&Container> {
        match self.slots.get(handle as usize)? {
            Slot::Live(c) => Some(c),
            Slot::Freed => None,
        }
    }

    pub fn get_mut(&mut self, handle: HeapHandle) -> Option<&mut Container> {
        match self.slots.get_mut(handle as usize)? {
            Slot::Live(c) => Some(c),
            Slot::Freed => None,
        }
    }

    /// Increment a container's `ref_cnt` - used when a value is shared into
    /// more than one parent container or frame.
    pub fn retain(&mut self, handle: HeapHandle) {
        if let Some(Slot::Live(c)) = self.slots.get_mut(handle as usize) {
            c.header.ref_cnt += 1;
        }
    }

    /// Decrement `ref_cnt`; if it reaches zero, collect the slot and return
    /// its direct children (for the caller to recursively free). Returns
    /// `None` if the handle is unknown, already freed, or still referenced.
    pub fn dec_ref_and_maybe_collect(&mut self, handle: HeapHandle) -> Option<Vec<Item>> {
        let header_hits_zero = match self.slots.get_mut(handle as usize)? {
            Slot::Live(c) => {
                c.header.ref_cnt = c.header.ref_cnt.saturating_sub(1);
                c.header.ref_cnt == 0
            }
            Slot::Freed => return None,
        };

        if !header_hits_zero {
            return None;
        }

        let children = match std::mem::replace(&mut self.slots[handle as usize], Slot::Freed) {
            Slot::Live(c) => c.kind.child_items(),
            Slot::Freed => unreachable!("checked Live above"),
        };
        self.live.remove(&handle);
        Some(children)
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

/// Ensure `header` carries the container header expected by [`Heap::alloc`];
/// exposed so `Context`/`ops` can build containers without repeating the
/// `ContainerHeader::new(.., true)` boilerplate at every call site.
#[must_use]
pub fn heap_header(type_id: crate::container::TypeId) -> ContainerHeader {
    ContainerHeader::new(type_id, true)
}
