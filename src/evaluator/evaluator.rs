//! The evaluator state and module-level execution.

use std::{
    io::{self, BufRead, Write},
    path::Path,
    rc::Rc,
};

use tracing::{debug, info};

use crate::{
    ast::{
        ast::Stmt,
        statements::{ExportStmt, ImportStmt},
    },
    errors::runtime::RuntimeError,
    module::graph::ImportGraph,
};

use super::{
    expr::eval_expr,
    scope::{ScopeArena, ScopeId},
    stmt::eval_stmt,
};

/// Holds everything a running program touches.
///
/// One evaluator serves every module of a program, so closures exported by one
/// module keep working after another module imports them.
pub struct Evaluator<'a> {
    /// Parsed modules and the exports filled in as they run
    pub graph: &'a mut ImportGraph,
    /// Every live scope of every module
    pub scopes: ScopeArena,
    /// Destination of `etch` and of `read` prompts
    output: &'a mut dyn Write,
    /// Source of `read` lines
    input: &'a mut dyn BufRead,
}

impl<'a> Evaluator<'a> {
    pub fn new(graph: &'a mut ImportGraph, output: &'a mut dyn Write, input: &'a mut dyn BufRead) -> Self {
        Evaluator {
            graph,
            scopes: ScopeArena::new(),
            output,
            input,
        }
    }

    /// Runs the module at `path` in a fresh root scope, once.
    ///
    /// The module is flagged as evaluated before its first statement runs, so
    /// a module is never executed twice however many modules import it.
    pub fn evaluate_module(&mut self, path: &Path) -> Result<(), RuntimeError> {
        let ast = match self.graph.module_mut(path) {
            Some(module) if module.evaluated => {
                debug!(module = %path.display(), "module already evaluated");
                return Ok(());
            }
            Some(module) => {
                module.evaluated = true;
                Rc::clone(&module.ast)
            }
            None => {
                return Err(RuntimeError::ModuleNotLoaded {
                    module: path.display().to_string(),
                })
            }
        };

        info!(module = %path.display(), "evaluating module");
        let scope = self.scopes.root();

        for statement in &ast.body {
            match statement {
                Stmt::Import(import) => self.import(import, scope)?,
                Stmt::Export(export) => self.export(export, path, scope)?,
                other => eval_stmt(self, other, scope)?,
            }

            if self.scopes.is_returning(scope) {
                debug!(module = %path.display(), "module returned early");
                break;
            }
        }

        Ok(())
    }

    /// Evaluates the imported module if needed, then binds the requested exports.
    fn import(&mut self, import: &ImportStmt, scope: ScopeId) -> Result<(), RuntimeError> {
        self.evaluate_module(&import.resolved)?;

        let module = self
            .graph
            .module(&import.resolved)
            .ok_or_else(|| RuntimeError::ModuleNotLoaded {
                module: import.resolved.display().to_string(),
            })?;

        let mut bindings = Vec::with_capacity(import.names.len());
        for name in &import.names {
            match module.exports.get(name) {
                Some(value) => bindings.push((name, value.clone())),
                None => {
                    return Err(RuntimeError::MissingExport {
                        symbol: name.clone(),
                        module: import.resolved.display().to_string(),
                    })
                }
            }
        }

        for (name, value) in bindings {
            self.scopes.define(scope, name, value);
        }
        Ok(())
    }

    fn export(&mut self, export: &ExportStmt, path: &Path, scope: ScopeId) -> Result<(), RuntimeError> {
        let value = eval_expr(self, &export.expression, scope)?;

        let module = self
            .graph
            .module_mut(path)
            .ok_or_else(|| RuntimeError::ModuleNotLoaded {
                module: path.display().to_string(),
            })?;

        debug!(module = %path.display(), name = %export.name, "export");
        module.exports.insert(export.name.clone(), value);
        Ok(())
    }

    pub(crate) fn write_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        writeln!(self.output, "{}", line).map_err(output_error)
    }

    pub(crate) fn write_prompt(&mut self, prompt: &str) -> Result<(), RuntimeError> {
        write!(self.output, "{}", prompt).map_err(output_error)?;
        self.output.flush().map_err(output_error)
    }

    /// Reads one line of input without its line ending. End of input is an error.
    pub(crate) fn read_line(&mut self) -> Result<String, RuntimeError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|error| RuntimeError::Input {
            reason: error.to_string(),
        })?;

        if read == 0 {
            return Err(RuntimeError::Input {
                reason: String::from("end of input"),
            });
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

fn output_error(error: io::Error) -> RuntimeError {
    RuntimeError::Output {
        reason: error.to_string(),
    }
}

/// Evaluates `entry` against the process's standard output and input.
pub fn evaluate(graph: &mut ImportGraph, entry: &Path) -> Result<(), RuntimeError> {
    let stdout = io::stdout();
    let stdin = io::stdin();
    let mut output = stdout.lock();
    let mut input = stdin.lock();

    Evaluator::new(graph, &mut output, &mut input).evaluate_module(entry)
}
