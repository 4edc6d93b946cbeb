// SPDX-License-Identifier: Apache-2.0

//! Cross-module link layer (spec §4.4).
//!
//! Each imported module is represented at link time by a [`ModuleStub`] with
//! a fixed field order - consts pointer, `_mod_main`, `_init_vars`, then one
//! slot per `pub fn` (in import order) and one slot per `pub let` (in
//! declared order). The generator originally emitted this as a literal C
//! struct; here it is a JIT data object built by [`crate::jit::JitBackend`]
//! with the same field layout, so link-time initialization is still "read a
//! fixed-offset struct, write resolved addresses into it" (spec §4.4.3),
//! just over JIT-managed memory instead of a `.bss` symbol.

use thiserror::Error;

use crate::script::ScriptId;
use crate::Item;

/// A resolved name as it appears inside a module's scope.
///
/// `import` is `None` for a name declared in the module itself, `Some(id)`
/// for a name pulled in through an `import` statement (aliased or not) -
/// this drives the `m{N}._name` prefixing of spec §4.4.5.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameEntry {
    pub local_name: String,
    pub import: Option<ScriptId>,
}

impl NameEntry {
    #[must_use]
    pub const fn local(name: String) -> Self {
        Self { local_name: name, import: None }
    }

    #[must_use]
    pub const fn imported(name: String, from: ScriptId) -> Self {
        Self { local_name: name, import: Some(from) }
    }

    /// The prefixed identifier code generation would emit for this name
    /// (spec §4.4.5: `m{N}._name` for imported names, the bare name
    /// otherwise).
    #[must_use]
    pub fn codegen_symbol(&self) -> String {
        match self.import {
            Some(module) => format!("m{module}._{}", self.local_name),
            None => format!("_{}", self.local_name),
        }
    }
}

/// Fixed-layout link record for one imported module (spec §4.4.1).
///
/// Field order is a contract, not an implementation detail: `mod_main` and
/// `init_vars` are always slots 0 and 1 after the consts pointer, and
/// `pub_fns`/`pub_lets` preserve declaration order because other modules'
/// generated call sites address them positionally.
#[derive(Clone, Debug, Default)]
pub struct ModuleStub {
    /// Address of the module's constant pool, swapped onto
    /// `Context.active_consts` for the duration of any call into this
    /// module (spec §4.4.2).
    pub consts_ptr: usize,
    /// Address of type registry swapped onto `Context.active_types` the
    /// same way.
    pub types_ptr: usize,
    /// `_mod_main` entry point - runs the module body exactly once.
    pub mod_main: Option<usize>,
    /// `_init_vars` entry point - copies `pub let` results out after
    /// `_mod_main` completes (spec §4.4.4).
    pub init_vars: Option<usize>,
    /// One resolved function pointer per `pub fn`, in import order.
    pub pub_fns: Vec<usize>,
    /// One resolved value slot per `pub let`, filled in by `init_vars`.
    pub pub_lets: Vec<Item>,
}

impl ModuleStub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("module {0} has no compiled entry point")]
    MissingEntryPoint(ScriptId),
    #[error("pub fn index {index} out of range for module {module} ({len} exported)")]
    FnIndexOutOfRange { module: ScriptId, index: usize, len: usize },
}

/// Per-module const/type swap discipline (spec §4.4.2).
///
/// `Context` keeps one of these per loaded module and pushes/pops the active
/// pointers around any call that crosses a module boundary, so nested calls
/// restore the caller's consts/types on return - the §9 redesign flag's
/// "explicit stack keyed by module id" rather than one mutable global.
#[derive(Default)]
pub struct ActiveStack<T: Clone> {
    frames: Vec<(ScriptId, T)>,
}

impl<T: Clone> ActiveStack<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Push `value` as active for `module`, to be matched by a later `pop`.
    pub fn push(&mut self, module: ScriptId, value: T) {
        self.frames.push((module, value));
    }

    /// Pop the most recently pushed frame, restoring whatever was active
    /// before it. Returns the popped value.
    pub fn pop(&mut self) -> Option<(ScriptId, T)> {
        self.frames.pop()
    }

    /// The currently active value, if any module's frame is on the stack.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.frames.last().map(|(_, v)| v)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Link-time initialization algorithm (spec §4.4.3), run once per module in
/// the loader's dependency order (imports before importers):
///
/// 1. If this module has already run - a later importer reaching the same
///    module - short-circuit without touching the consts/types stacks or
///    invoking `_mod_main`/`_init_vars` again (spec §4.4: the execute-once
///    guard means "subsequent calls... short-circuit without re-running",
///    "subsequent calls return NULL Item"; this is a successful no-op, not a
///    link error).
/// 2. Otherwise, verify the module has a compiled `_mod_main` (link error
///    otherwise - every loaded module must have gone through the JIT before
///    linking).
/// 3. Push this module's consts/types as active.
/// 4. Invoke `_mod_main`, then `_init_vars` to copy `pub let` results into
///    the stub's `pub_lets`.
/// 5. Pop the consts/types frame, restoring the caller's.
pub fn init_module_import<F>(
    module: ScriptId,
    stub: &mut ModuleStub,
    already_initialized: bool,
    active_consts: &mut ActiveStack<usize>,
    active_types: &mut ActiveStack<usize>,
    mut run_compiled: F,
) -> Result<(), LinkError>
where
    F: FnMut(usize),
{
    if already_initialized {
        return Ok(());
    }
    let Some(entry) = stub.mod_main else { return Err(LinkError::MissingEntryPoint(module)) };

    active_consts.push(module, stub.consts_ptr);
    active_types.push(module, stub.types_ptr);

    run_compiled(entry);
    if let Some(init_vars) = stub.init_vars {
        run_compiled(init_vars);
    }

    active_types.pop();
    active_consts.pop();
    Ok(())
}

/// Look up a module's `pub fn` pointer by its declared index (used by
/// generated call sites addressing `m{N}._func(args)`).
pub fn resolve_pub_fn(stub: &ModuleStub, module: ScriptId, index: usize) -> Result<usize, LinkError> {
    stub.pub_fns
        .get(index)
        .copied()
        .ok_or(LinkError::FnIndexOutOfRange { module, index, len: stub.pub_fns.len() })
}
