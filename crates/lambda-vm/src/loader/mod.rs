// SPDX-License-Identifier: Apache-2.0

//! Eager, depth-first multi-module loader (spec §3.3/§4.3).
//!
//! Loading an entry script resolves its whole import graph before anything
//! runs: every transitive import is parsed and linked first, in dependency
//! order, so that by the time `_mod_main` of any module executes, every
//! module it imports is already fully initialized (spec §4.4.4 depends on
//! this ordering).

#[cfg(test)]
mod loader_test;

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{Node, NodeKind};
use crate::link::NameEntry;
use crate::script::{Script, ScriptId};

/// Something that can turn a module path into source text - the parser
/// front end and filesystem access live outside this crate; tests and the
/// CLI binary each provide their own.
pub trait SourceResolver {
    /// Resolve an import path (as written after `import`) to its canonical
    /// path and source text, or `None` if nothing provides it.
    fn resolve(&self, import_path: &str) -> Option<(String, String)>;

    /// Parse source text into an AST. A real front end tokenizes and parses
    /// `Lambda` syntax; this crate only requires whatever it returns to
    /// satisfy the [`crate::ast`] contract.
    fn parse(&self, canonical_path: &str, source: &str) -> Node;
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not resolve import {0:?}")]
    UnresolvedImport(String),
    #[error("circular import detected: {}", chain.join(" -> "))]
    CircularImport { chain: Vec<String> },
    #[error("absolute/package-style import paths are not supported: {0:?}")]
    UnsupportedImportPath(String),
    #[error("import graph exceeds the configured maximum depth ({0})")]
    ImportTooDeep(usize),
}

/// Owns every loaded [`Script`], keyed by canonical path for dedup (spec
/// §4.3 step 4: a module imported from two places loads once).
pub struct Loader {
    scripts: Vec<Script>,
    by_path: HashMap<String, ScriptId>,
    max_depth: usize,
}

impl Loader {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { scripts: Vec::new(), by_path: HashMap::new(), max_depth }
    }

    #[must_use]
    pub fn script(&self, id: ScriptId) -> &Script {
        &self.scripts[id as usize]
    }

    pub fn script_mut(&mut self, id: ScriptId) -> &mut Script {
        &mut self.scripts[id as usize]
    }

    #[must_use]
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Load `entry_path` as the main script, resolving its whole import
    /// graph. Returns the main script's id (always `0` on a fresh loader).
    ///
    /// Implements spec §4.3's 8-step algorithm:
    /// 1. Reject absolute/package-style import paths up front (§9 open
    ///    question, resolved).
    /// 2. The entry script is always assigned id 0.
    /// 3. Depth-first: before a script is considered loaded, every import it
    ///    names is loaded first.
    /// 4. Dedup by canonical path - a module already loaded (or in
    ///    progress) is reused, never re-parsed.
    /// 5. A script in progress (`is_loading`) that gets imported again is a
    ///    cycle - reported with the full chain.
    /// 6. Aliased imports register their public names under the alias
    ///    namespace rather than polluting the importer's scope (§9).
    /// 7. `finish_loading` runs only after every import is fully resolved.
    /// 8. The importer's own name resolution runs last, once all its
    ///    imports are in the table.
    pub fn load_script(&mut self, entry_path: &str, resolver: &dyn SourceResolver) -> Result<ScriptId, LoadError> {
        reject_unsupported_path(entry_path)?;
        let mut loading_chain = Vec::new();
        self.load_recursive(entry_path, resolver, &mut loading_chain, true, 0)
    }

    fn load_recursive(
        &mut self,
        import_path: &str,
        resolver: &dyn SourceResolver,
        loading_chain: &mut Vec<String>,
        is_main: bool,
        depth: usize,
    ) -> Result<ScriptId, LoadError> {
        if depth > self.max_depth {
            return Err(LoadError::ImportTooDeep(self.max_depth));
        }

        let (canonical_path, source) =
            resolver.resolve(import_path).ok_or_else(|| LoadError::UnresolvedImport(import_path.to_string()))?;

        if let Some(&existing) = self.by_path.get(&canonical_path) {
            if self.scripts[existing as usize].is_loading {
                let mut chain = loading_chain.clone();
                chain.push(canonical_path);
                return Err(LoadError::CircularImport { chain });
            }
            return Ok(existing);
        }

        let id = self.scripts.len() as ScriptId;
        self.scripts.push(Script::new(id, canonical_path.clone(), source.clone(), is_main));
        self.by_path.insert(canonical_path.clone(), id);
        loading_chain.push(canonical_path.clone());

        let ast = resolver.parse(&canonical_path, &source);
        let import_nodes = collect_imports(&ast);

        let mut imports = Vec::with_capacity(import_nodes.len());
        let mut names: HashMap<String, NameEntry> = HashMap::new();
        for (path, alias) in import_nodes {
            reject_unsupported_path(&path)?;
            let imported_id = self.load_recursive(&path, resolver, loading_chain, false, depth + 1)?;
            imports.push(imported_id);
            register_import_names(&mut names, &self.scripts[imported_id as usize], alias.as_deref());
        }

        register_local_names(&mut names, &ast);

        let script = &mut self.scripts[id as usize];
        script.ast = Some(ast);
        script.imports = imports;
        script.names = names;
        script.finish_loading();

        loading_chain.pop();
        Ok(id)
    }
}

fn reject_unsupported_path(path: &str) -> Result<(), LoadError> {
    // Package-style absolute imports (`std.math`, a leading `/`) are
    // explicitly out of scope (spec §9, resolved): only relative module
    // paths that a `SourceResolver` can map straight to a file are allowed.
    if path.starts_with('/') || path.starts_with("std.") || path.starts_with("pkg:") {
        return Err(LoadError::UnsupportedImportPath(path.to_string()));
    }
    Ok(())
}

fn collect_imports(ast: &Node) -> Vec<(String, Option<String>)> {
    let NodeKind::Content(stmts) = &ast.kind else { return Vec::new() };
    stmts
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Import { path, alias } => Some((path.clone(), alias.clone())),
            _ => None,
        })
        .collect()
}

fn register_import_names(names: &mut HashMap<String, NameEntry>, imported: &Script, alias: Option<&str>) {
    for (local_name, entry) in &imported.names {
        if entry.import.is_some() {
            // Only the imported module's own public surface is re-exported
            // transitively through re-export syntax (not modeled here);
            // names it imported from elsewhere stay private to it.
            continue;
        }
        let key = match alias {
            Some(alias) => format!("{alias}.{local_name}"),
            None => local_name.clone(),
        };
        names.insert(key, NameEntry::imported(local_name.clone(), imported.id));
    }
}

fn register_local_names(names: &mut HashMap<String, NameEntry>, ast: &Node) {
    let NodeKind::Content(stmts) = &ast.kind else { return };
    for node in stmts {
        match &node.kind {
            NodeKind::LetStam { name, is_pub: true, .. } | NodeKind::PubStam { name, is_pub: true, .. } => {
                names.insert(name.clone(), NameEntry::local(name.clone()));
            }
            _ => {}
        }
    }
}
