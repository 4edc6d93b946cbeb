// SPDX-License-Identifier: Apache-2.0

//! Dual allocation model (spec §3.2/§4.2): bulk-freed [`Arena`]s for parsed
//! input, individually ref-counted [`Heap`] allocations for computed values.

mod arena;
mod heap;


pub use arena::{Arena, ArenaHandle};
pub use heap::{heap_header, Heap, HeapHandle};

use crate::Item;

/// Free a single item per spec §4.2 `free_item`: primitives are a no-op,
/// containers go through [`free_container`].
pub fn free_item(heap: &mut Heap, item: Item) {
    if item.tag().is_container() {
        free_container(heap, item);
    }
}

/// `free_container` (spec §4.2): early return if the container isn't
/// heap-owned (arena containers are bulk-freed with their arena, never
/// individually); otherwise decrement `ref_cnt` and free at zero, freeing
/// children recursively.
pub fn free_container(heap: &mut Heap, item: Item) {
    let Some(slot) = item.handle() else { return };
    let Some(is_heap) = heap.is_heap_handle(slot) else { return };
    if !is_heap {
        // Arena-allocated: no-op, per §4.2. `ref_cnt` is never touched.
        return;
    }

    let Some(children) = heap.dec_ref_and_maybe_collect(slot) else { return };
    for child in children {
        if child.tag().is_container() {
            free_container(heap, child);
        }
    }
}

#[cfg(test)]
mod free_test {
    use super::{free_container, Heap};
    use crate::container::{Container, ContainerHeader, ContainerKind};
    use crate::Item;

    #[test]
    fn dropping_last_ref_frees_recursively() {
        let mut heap = Heap::new();
        let inner = heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::List(vec![Item::int(1)])));
        let outer = heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::List(vec![inner])));

        assert!(heap.contains(inner.handle().unwrap()));
        free_container(&mut heap, outer);
        assert!(!heap.contains(outer.handle().unwrap()));
        assert!(!heap.contains(inner.handle().unwrap()));
    }

    #[test]
    fn shared_child_survives_one_drop() {
        let mut heap = Heap::new();
        let shared = heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::List(vec![])));
        heap.retain(shared.handle().unwrap());
        let a = heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::List(vec![shared])));
        let b = heap.alloc(Container::new(ContainerHeader::new(0, true), ContainerKind::List(vec![shared])));

        free_container(&mut heap, a);
        assert!(heap.contains(shared.handle().unwrap()), "still referenced by b");
        free_container(&mut heap, b);
        assert!(!heap.contains(shared.handle().unwrap()));
    }
}
