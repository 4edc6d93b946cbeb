// SPDX-License-Identifier: Apache-2.0

//! # Lambda VM
//!
//! Execution runtime for the Lambda scripting language: the tagged value
//! representation, the arena/heap memory model, the multi-module loader and
//! cross-module link layer, and the Cranelift-backed JIT integration that
//! turns each script's AST into native code sharing one process-wide heap.
//!
//! This crate implements the core described in `SPEC_FULL.md` §2-§9: the
//! grammar/parser front end, the transpile-to-C stage, the REPL line editor
//! and input-format parsers are out of scope and treated as external
//! collaborators (only the minimal [`ast`] contract they would hand us is
//! modeled here, for tests).

pub mod ast;
pub mod container;
pub mod context;
pub mod jit;
pub mod link;
pub mod loader;
pub mod memory;
pub mod ops;
pub mod repl;
pub mod script;

pub use lambda_core::{Decimal, DecimalContext, Item, NumberStack, Tag};

pub use container::{Container, ContainerHeader, ContainerKind};
pub use context::{Context, RuntimeConfig};
pub use link::{ModuleStub, NameEntry};
pub use loader::{LoadError, Loader};
pub use memory::{Arena, Heap};
pub use script::{Script, ScriptId};

/// Crate version, for `--version` and runtime diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
