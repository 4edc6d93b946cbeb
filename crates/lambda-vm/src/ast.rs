// SPDX-License-Identifier: Apache-2.0

//! Minimal AST contract this crate consumes (`SPEC_FULL.md` §4).
//!
//! The grammar, lexer and parser are external collaborators and out of scope
//! here. What the loader and link layer actually need from a parsed script is
//! small: the list of imports (with optional alias), the public surface
//! (`pub fn`/`pub let`), and everything else treated as opaque content the
//! JIT backend will lower. A parser handing us a [`Node`] tree satisfying
//! this contract is all the rest of the crate assumes.

/// Stable identifier for a node within one script's AST. Unique per script,
/// not across scripts - combine with a `ScriptId` to get a global identity.
pub type NodeId = u32;

/// One node of a script's AST, as handed to the loader after parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub const fn new(id: NodeId, kind: NodeKind) -> Self {
        Self { id, kind }
    }
}

/// The shapes of top-level and nested constructs the loader/link layer care
/// about. Everything that doesn't affect module wiring collapses into
/// [`NodeKind::Expr`] - its internal shape is irrelevant to this crate.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// `import <path>[ as <alias>]` - spec §4.3 step 1, §9 aliased-import
    /// resolution.
    Import { path: String, alias: Option<String> },
    /// `let <name> = <expr>` at module scope, optionally `pub`.
    LetStam { name: String, is_pub: bool, value: Box<Node> },
    /// `fn <name>(...) { ... }` at module scope, optionally `pub`.
    PubStam { name: String, is_pub: bool, params: Vec<String>, body: Vec<Node> },
    /// Top-level ordered content: the list of statements that make up
    /// `_mod_main`'s body, in source order.
    Content(Vec<Node>),
    /// Any expression or statement whose internal shape the loader/link
    /// layer never inspects directly.
    Expr,
}
