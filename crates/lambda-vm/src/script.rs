// SPDX-License-Identifier: Apache-2.0

//! A single loaded module (spec §3.3 "Script").

use std::collections::HashMap;

use crate::ast::Node;
use crate::container::TypeId;
use crate::link::NameEntry;
use crate::Item;

/// Index of a [`Script`] within a [`crate::loader::Loader`]'s table.
///
/// Stable for the lifetime of the loader; module 0 is always the entry
/// script (spec §4.3 step 2, "the main script is always index 0").
pub type ScriptId = u32;

/// One loaded, parsed (and eventually JIT-compiled) module.
///
/// A `Script` moves through a small lifecycle: created with `is_loading =
/// true` while its imports are still being resolved (so the cycle check in
/// [`crate::loader::Loader`] can see it), then `is_loading = false` once its
/// own AST has been fully read, and finally `initialized = true` the first
/// (and only) time its `_mod_main` runs (spec §4.4.4 execute-once guard).
pub struct Script {
    pub id: ScriptId,
    /// Canonical, resolved source path - the loader's dedup key.
    pub canonical_path: String,
    /// Whether this is the entry point passed to the loader.
    pub is_main: bool,
    /// Set while this script's imports are being resolved; a second attempt
    /// to load a script with this flag set is a circular import (spec
    /// §4.3 step 1).
    pub is_loading: bool,
    /// Set once `_mod_main` has run. Checked before every call so an
    /// already-initialized module is never executed twice (spec §4.4.4).
    pub initialized: bool,
    /// Source text, kept for diagnostics.
    pub source: String,
    /// Parsed AST root (a `Content` node listing this module's top-level
    /// statements), if parsing has completed.
    pub ast: Option<Node>,
    /// Resolved, possibly import-prefixed names visible inside this module
    /// (spec §4.4.5).
    pub names: HashMap<String, NameEntry>,
    /// This module's constant pool, swapped onto `Context.active_consts`
    /// while this module's code runs (spec §4.4.2).
    pub const_list: Vec<Item>,
    /// This module's type registry, swapped onto `Context.active_types`
    /// while this module's code runs (spec §4.4.2).
    pub type_list: Vec<TypeId>,
    /// Modules this one imports, in declared order - the loader resolves
    /// these depth-first before this script transpiles (spec §4.3 step 3).
    pub imports: Vec<ScriptId>,
}

impl Script {
    #[must_use]
    pub fn new(id: ScriptId, canonical_path: String, source: String, is_main: bool) -> Self {
        Self {
            id,
            canonical_path,
            is_main,
            is_loading: true,
            initialized: false,
            source,
            ast: None,
            names: HashMap::new(),
            const_list: Vec::new(),
            type_list: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Mark this script as done resolving its own imports (spec §4.3 step
    /// 1's loading-set entry is cleared here).
    pub fn finish_loading(&mut self) {
        self.is_loading = false;
    }
}

#[cfg(test)]
mod script_test {
    use super::Script;

    #[test]
    fn new_script_starts_loading_and_uninitialized() {
        let s = Script::new(0, "main.ls".into(), "".into(), true);
        assert!(s.is_loading);
        assert!(!s.initialized);
        assert!(s.is_main);
    }

    #[test]
    fn finish_loading_clears_the_flag() {
        let mut s = Script::new(1, "lib.ls".into(), "".into(), false);
        s.finish_loading();
        assert!(!s.is_loading);
    }
}
