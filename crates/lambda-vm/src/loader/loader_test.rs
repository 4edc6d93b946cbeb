//! Tests for the loader module.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{LoadError, Loader, SourceResolver};
use crate::ast::{Node, NodeKind};

/// An in-memory resolver driven entirely by a fixed `path -> AST` table, so
/// loader tests never depend on a real parser front end.
struct FixtureResolver {
    modules: HashMap<&'static str, Node>,
    parse_calls: RefCell<Vec<String>>,
}

impl FixtureResolver {
    fn new(modules: Vec<(&'static str, Node)>) -> Self {
        Self { modules: modules.into_iter().collect(), parse_calls: RefCell::new(Vec::new()) }
    }
}

impl SourceResolver for FixtureResolver {
    fn resolve(&self, import_path: &str) -> Option<(String, String)> {
        self.modules.contains_key(import_path).then(|| (import_path.to_string(), String::new()))
    }

    fn parse(&self, canonical_path: &str, _source: &str) -> Node {
        self.parse_calls.borrow_mut().push(canonical_path.to_string());
        self.modules[canonical_path].clone()
    }
}

fn content(stmts: Vec<Node>) -> Node {
    Node::new(0, NodeKind::Content(stmts))
}

fn import(path: &str, alias: Option<&str>) -> Node {
    Node::new(0, NodeKind::Import { path: path.into(), alias: alias.map(String::from) })
}

fn pub_let(name: &str) -> Node {
    Node::new(0, NodeKind::LetStam { name: name.into(), is_pub: true, value: Box::new(Node::new(0, NodeKind::Expr)) })
}

#[test]
fn single_module_with_no_imports_loads() {
    let resolver = FixtureResolver::new(vec![("main.ls", content(vec![pub_let("x")]))]);
    let mut loader = Loader::new(256);
    let id = loader.load_script("main.ls", &resolver).unwrap();
    assert_eq!(id, 0);
    assert!(loader.script(0).is_main);
    assert!(loader.script(0).names.contains_key("x"));
}

#[test]
fn imports_are_loaded_before_the_importer_finishes() {
    let resolver = FixtureResolver::new(vec![
        ("main.ls", content(vec![import("lib.ls", None), pub_let("main_x")])),
        ("lib.ls", content(vec![pub_let("helper")])),
    ]);
    let mut loader = Loader::new(256);
    let main_id = loader.load_script("main.ls", &resolver).unwrap();
    assert_eq!(loader.script(main_id).imports.len(), 1);
    let lib_id = loader.script(main_id).imports[0];
    assert!(!loader.script(lib_id).is_loading);
    assert!(loader.script(main_id).names.contains_key("helper"));
}

#[test]
fn diamond_import_loads_shared_module_once() {
    let resolver = FixtureResolver::new(vec![
        ("main.ls", content(vec![import("a.ls", None), import("b.ls", None)])),
        ("a.ls", content(vec![import("shared.ls", None)])),
        ("b.ls", content(vec![import("shared.ls", None)])),
        ("shared.ls", content(vec![pub_let("value")])),
    ]);
    let mut loader = Loader::new(256);
    loader.load_script("main.ls", &resolver).unwrap();
    assert_eq!(resolver.parse_calls.borrow().iter().filter(|p| p.as_str() == "shared.ls").count(), 1);
    assert_eq!(loader.scripts().len(), 4);
}

#[test]
fn circular_import_is_detected() {
    let resolver = FixtureResolver::new(vec![
        ("a.ls", content(vec![import("b.ls", None)])),
        ("b.ls", content(vec![import("a.ls", None)])),
    ]);
    let mut loader = Loader::new(256);
    let err = loader.load_script("a.ls", &resolver).unwrap_err();
    assert!(matches!(err, LoadError::CircularImport { .. }));
}

#[test]
fn aliased_import_registers_names_under_the_alias() {
    let resolver = FixtureResolver::new(vec![
        ("main.ls", content(vec![import("geo.ls", Some("geo"))])),
        ("geo.ls", content(vec![pub_let("area")])),
    ]);
    let mut loader = Loader::new(256);
    let main_id = loader.load_script("main.ls", &resolver).unwrap();
    assert!(loader.script(main_id).names.contains_key("geo.area"));
    assert!(!loader.script(main_id).names.contains_key("area"));
}

#[test]
fn absolute_import_path_is_rejected() {
    let resolver = FixtureResolver::new(vec![("main.ls", content(vec![import("std.math", None)]))]);
    let mut loader = Loader::new(256);
    let err = loader.load_script("main.ls", &resolver).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedImportPath(_)));
}

#[test]
fn unresolved_import_is_an_error() {
    let resolver = FixtureResolver::new(vec![("main.ls", content(vec![import("missing.ls", None)]))]);
    let mut loader = Loader::new(256);
    let err = loader.load_script("main.ls", &resolver).unwrap_err();
    assert!(matches!(err, LoadError::UnresolvedImport(_)));
}
