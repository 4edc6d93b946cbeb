// SPDX-License-Identifier: Apache-2.0

//! Interactive loop (spec §6): `lambda` with no script argument reads lines
//! from the terminal, evaluates each, and prints the result - until EOF or
//! an explicit `exit`.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;
use tracing::{info, warn};

use crate::ops::fn_format;
use crate::Context;

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("line editor failed: {0}")]
    Editor(#[from] ReadlineError),
}

/// One turn of the REPL: parse+evaluate `line` against `ctx`. The actual
/// grammar/evaluator is external to this crate (spec §1 Non-goals); this
/// hook is where a real front end would plug in. Kept as a trait so tests
/// can exercise the loop without a parser.
pub trait LineEvaluator {
    fn eval_line(&mut self, ctx: &mut Context, line: &str) -> Option<lambda_core::Item>;
}

/// Run the interactive loop until EOF (Ctrl-D) or the user types `exit`.
///
/// Every accepted line is fed to `evaluator`; a `Some(item)` result is
/// printed with [`fn_format`], `None` means the line produced no value
/// (e.g. a bare `let` statement) and nothing is printed.
pub fn run(ctx: &mut Context, evaluator: &mut dyn LineEvaluator) -> Result<(), ReplError> {
    let mut editor = DefaultEditor::new()?;
    info!("lambda interactive session started");

    loop {
        match editor.readline("lambda> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);
                if trimmed == "exit" {
                    break;
                }
                if let Some(result) = evaluator.eval_line(ctx, trimmed) {
                    println!("{}", fn_format(ctx, result));
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                warn!(error = %err, "line editor error, ending session");
                return Err(err.into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod repl_test {
    use super::LineEvaluator;
    use crate::Context;
    use lambda_core::Item;

    struct EchoIntEvaluator;

    impl LineEvaluator for EchoIntEvaluator {
        fn eval_line(&mut self, _ctx: &mut Context, line: &str) -> Option<Item> {
            line.trim().parse::<i32>().ok().map(Item::int)
        }
    }

    #[test]
    fn evaluator_trait_can_be_exercised_without_a_real_parser() {
        let mut ctx = Context::default();
        let mut evaluator = EchoIntEvaluator;
        assert_eq!(evaluator.eval_line(&mut ctx, "42").map(|i| i.as_int()), Some(Some(42)));
        assert_eq!(evaluator.eval_line(&mut ctx, "not a number"), None);
    }
}
