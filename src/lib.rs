//! `rox`: a tree‑walking interpreter for the Lox language.
//!
//! Source text flows through four stages, each in its own module:
//! [`scanner`] → [`parser`] → [`resolver`] → [`interpreter`].  The first
//! three only accumulate diagnostics; any diagnostic stops the pipeline
//! before anything executes.  [`Lox`] wires the stages together and keeps
//! interpreter state between runs (for the REPL).

pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use std::io::{self, Write};

use log::{debug, info};

use error::LoxError;
use interpreter::Interpreter;
use parser::Parser;
use resolver::{Locals, Resolver};
use stmt::Stmt;

/// Exit status for a run that produced static diagnostics.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for a run stopped by a runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// How a single [`Lox::run`] ended.
#[derive(Debug)]
pub enum Outcome {
    Success,

    /// Scan, parse or resolve diagnostics, in source order.  Nothing ran.
    StaticErrors(Vec<LoxError>),

    /// The first runtime error; statements after it did not run.
    RuntimeError(LoxError),
}

impl Outcome {
    /// Conventional process exit code: 0, 65 or 70.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::StaticErrors(_) => EXIT_STATIC_ERROR,
            Outcome::RuntimeError(_) => EXIT_RUNTIME_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Every diagnostic this run produced.
    pub fn diagnostics(&self) -> Vec<&LoxError> {
        match self {
            Outcome::Success => Vec::new(),
            Outcome::StaticErrors(errors) => errors.iter().collect(),
            Outcome::RuntimeError(error) => vec![error],
        }
    }
}

/// An interpreter session printing to `W`.  Globals, functions and classes
/// defined by one `run` are visible to the next.
pub struct Lox<W: Write> {
    interpreter: Interpreter<W>,
}

impl<W: Write> Lox<W> {
    pub fn new(out: W) -> Self {
        Self {
            interpreter: Interpreter::new(out),
        }
    }

    /// Scan, parse, resolve and execute `source`.
    pub fn run(&mut self, source: &str) -> Outcome {
        info!("Running {} byte(s) of source", source.len());

        let (tokens, mut diagnostics) = scanner::scan_tokens(source);

        let statements: Vec<Stmt> = match Parser::new(tokens).parse() {
            Ok(statements) => statements,
            Err(errors) => {
                diagnostics.extend(errors);
                return Outcome::StaticErrors(diagnostics);
            }
        };

        if !diagnostics.is_empty() {
            return Outcome::StaticErrors(diagnostics);
        }

        let locals: Locals = match Resolver::new().resolve(&statements) {
            Ok(locals) => locals,
            Err(errors) => return Outcome::StaticErrors(errors),
        };

        debug!("Executing {} statement(s)", statements.len());

        self.interpreter.resolve(locals);

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Success,
            Err(error) => Outcome::RuntimeError(error),
        }
    }

    /// The sink `print` writes to.
    pub fn output(&self) -> &W {
        self.interpreter.writer()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_writer()
    }
}

/// Run `source` once in a fresh session, printing to stdout.
pub fn run(source: &str) -> Outcome {
    Lox::new(io::stdout()).run(source)
}
