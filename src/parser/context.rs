//! State shared across every file parsed for one program.

use std::{
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, info};

use crate::{
    ast::statements::BlockStmt,
    errors::{diagnostics::Diagnostics, errors::Error, module::LoadError},
    lexer::{lexer::tokenize, stream::TokenStream},
    module::{graph::ImportGraph, resolve::normalize},
};

use super::parser::parse;

/// A parsed file's tokens and diagnostics, kept for error rendering.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub stream: TokenStream,
    pub diagnostics: Diagnostics,
}

/// The import graph plus every parsed file, in the order their parses finished.
#[derive(Debug)]
pub struct ParseContext {
    pub graph: ImportGraph,
    files: Vec<SourceFile>,
    entry: PathBuf,
}

impl ParseContext {
    /// Reads and parses `entry`, following imports as they are found.
    pub fn load(entry: &Path) -> Result<Self, LoadError> {
        let path = normalize(entry);
        info!(entry = %path.display(), "loading program");

        let source = read_source(&path)?;
        ParseContext::from_source(&path, &source).map_err(|error| LoadError::Lex {
            path: path.display().to_string(),
            error,
        })
    }

    /// Parses `source` as if it had been read from `path`.
    pub fn from_source(path: &Path, source: &str) -> Result<Self, Error> {
        let mut context = ParseContext {
            graph: ImportGraph::new(),
            files: vec![],
            entry: path.to_path_buf(),
        };

        context.graph.insert(path);
        context.parse_source(path, source)?;
        Ok(context)
    }

    pub(crate) fn load_import(&mut self, path: &Path) -> Result<(), LoadError> {
        debug!(module = %path.display(), "parsing imported module");
        let source = read_source(path)?;
        self.parse_source(path, &source).map_err(|error| LoadError::Lex {
            path: path.display().to_string(),
            error,
        })
    }

    fn parse_source(&mut self, path: &Path, source: &str) -> Result<(), Error> {
        let tokens = tokenize(source)?;
        let (ast, file) = parse(tokens, path, self);

        if file.diagnostics.has_errors() {
            debug!(module = %path.display(), count = file.diagnostics.len(), "parse finished with diagnostics");
        }

        self.graph.set_module(path, ast);
        self.files.push(file);
        Ok(())
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry
    }

    pub fn entry_ast(&self) -> Option<Rc<BlockStmt>> {
        self.graph.module(&self.entry).map(|module| Rc::clone(&module.ast))
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|file| file.diagnostics.has_errors())
    }

    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|file| file.diagnostics.len()).sum()
    }

    pub fn render_diagnostics(&self) -> String {
        self.files
            .iter()
            .map(|file| file.diagnostics.render(&file.path, &file.stream))
            .collect()
    }

    pub fn find_cycles(&self) -> Vec<PathBuf> {
        let cycle = self.graph.find_cycles();
        if !cycle.is_empty() {
            debug!(length = cycle.len(), "import cycle detected");
        }
        cycle
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}
