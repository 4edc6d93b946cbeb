// SPDX-License-Identifier: Apache-2.0

//! The single process-wide runtime object (spec §3.4/§4.5, §5).

use std::marker::PhantomData;

use lambda_core::{DecimalContext, NumberStack};

use crate::link::ActiveStack;
use crate::memory::{Arena, Heap};
use crate::Item;

/// Tunable limits and growth parameters, parsed from CLI flags at the
/// binary entry point (`SPEC_FULL.md` §1).
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Number of extra slots reserved each time the heap's backing storage
    /// grows, amortizing repeated small allocations.
    pub heap_growth_increment: usize,
    /// Initial capacity reserved on the number stack at startup.
    pub number_stack_initial_capacity: usize,
    /// Maximum depth of the import graph the loader will follow before
    /// giving up (distinct from circular-import detection, which is exact;
    /// this is a sanity backstop against pathologically deep chains).
    pub max_import_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { heap_growth_increment: 256, number_stack_initial_capacity: 64, max_import_depth: 256 }
    }
}

/// The single process-wide runtime state: heap, arena pool, active
/// consts/types stacks, number stack, decimal context, and the final result
/// slot a script's `_mod_main` leaves its value in.
///
/// Deliberately `!Sync` (it holds no `unsafe impl Sync`, and its fields are
/// plain owned/interior-mutable types) - this is spec §5's single-threaded
/// model enforced at the type level rather than left to convention.
pub struct Context {
    pub config: RuntimeConfig,
    pub heap: Heap,
    pub arenas: Vec<Arena>,
    pub numbers: NumberStack,
    pub decimal_ctx: DecimalContext,
    pub active_consts: ActiveStack<usize>,
    pub active_types: ActiveStack<usize>,
    /// Value left by the most recently completed top-level evaluation -
    /// what the REPL or CLI prints.
    pub result: Item,
    /// `*const ()` is neither `Send` nor `Sync`; carrying one here is what
    /// actually makes `Context` `!Sync` at the type level rather than by
    /// convention (spec §5). `Send` is suppressed too since nothing in this
    /// runtime is meant to cross a thread boundary at all.
    _not_thread_safe: PhantomData<*const ()>,
}

impl Context {
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            heap: Heap::new(),
            arenas: Vec::new(),
            numbers: NumberStack::new(),
            decimal_ctx: DecimalContext::default(),
            active_consts: ActiveStack::new(),
            active_types: ActiveStack::new(),
            result: Item::NULL,
            _not_thread_safe: PhantomData,
        }
    }

    /// Start a fresh arena (for a newly parsed script's input) and return
    /// its index into [`Context::arenas`].
    pub fn new_arena(&mut self) -> usize {
        self.arenas.push(Arena::new());
        self.arenas.len() - 1
    }

    /// Whether every heap allocation made during this context's lifetime has
    /// since been freed - used by tests and the CLI's `--trace` leak report,
    /// never by production control flow.
    #[must_use]
    pub fn heap_is_clean(&self) -> bool {
        self.heap.live_count() == 0
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}
