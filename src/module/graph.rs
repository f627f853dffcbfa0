//! Directed graph of module paths discovered while parsing imports.
//!
//! Nodes live in an arena and are addressed by index; a path lookup table maps
//! canonical paths to indices. Edges are index lists, so cycles are fine.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::trace;

use crate::{ast::statements::BlockStmt, evaluator::value::Value};

/// A parsed module: its AST plus the exports filled in when it is evaluated.
#[derive(Debug)]
pub struct ModuleRecord {
    pub path: PathBuf,
    pub ast: Rc<BlockStmt>,
    pub exports: HashMap<String, Value>,
    pub evaluated: bool,
}

impl ModuleRecord {
    pub fn new(path: PathBuf, ast: BlockStmt) -> Self {
        ModuleRecord {
            path,
            ast: Rc::new(ast),
            exports: HashMap::new(),
            evaluated: false,
        }
    }
}

#[derive(Debug)]
pub struct ImportNode {
    pub path: PathBuf,
    pub edges: Vec<usize>,
    pub module: Option<ModuleRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

#[derive(Debug, Default)]
pub struct ImportGraph {
    nodes: Vec<ImportNode>,
    lookup: HashMap<PathBuf, usize>,
}

impl ImportGraph {
    pub fn new() -> Self {
        ImportGraph::default()
    }

    /// Returns the node for `path`, creating it if needed.
    pub fn insert(&mut self, path: &Path) -> usize {
        if let Some(index) = self.lookup.get(path) {
            return *index;
        }

        self.nodes.push(ImportNode {
            path: path.to_path_buf(),
            edges: vec![],
            module: None,
        });
        self.lookup.insert(path.to_path_buf(), self.nodes.len() - 1);
        self.nodes.len() - 1
    }

    /// Adds the edge `source -> dest`, creating either node if needed.
    ///
    /// Adding an existing edge again is a no-op. Returns the destination node.
    pub fn add(&mut self, source: &Path, dest: &Path) -> usize {
        let source = self.insert(source);
        let dest = self.insert(dest);

        if !self.nodes[source].edges.contains(&dest) {
            trace!(from = %self.nodes[source].path.display(), to = %self.nodes[dest].path.display(), "import edge");
            self.nodes[source].edges.push(dest);
        }

        dest
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lookup.contains_key(path)
    }

    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.lookup.get(path).copied()
    }

    pub fn node(&self, index: usize) -> &ImportNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[ImportNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_module(&mut self, path: &Path, ast: BlockStmt) {
        let index = self.insert(path);
        self.nodes[index].module = Some(ModuleRecord::new(path.to_path_buf(), ast));
    }

    pub fn module(&self, path: &Path) -> Option<&ModuleRecord> {
        self.index_of(path).and_then(|index| self.nodes[index].module.as_ref())
    }

    pub fn module_mut(&mut self, path: &Path) -> Option<&mut ModuleRecord> {
        let index = self.index_of(path)?;
        self.nodes[index].module.as_mut()
    }

    /// Finds one import cycle, if any exists anywhere in the graph.
    ///
    /// Every node is used as a DFS root until a cycle turns up, so components
    /// unreachable from the entry module are checked too. The returned path runs
    /// from the module where the cycle was entered to the one that closes it.
    /// An empty vector means the graph is acyclic.
    pub fn find_cycles(&self) -> Vec<PathBuf> {
        let mut colors = vec![Color::White; self.nodes.len()];
        let mut parents: Vec<Option<usize>> = vec![None; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if colors[start] != Color::White {
                continue;
            }

            if let Some(cycle) = self.visit(start, &mut colors, &mut parents) {
                return cycle
                    .into_iter()
                    .map(|index| self.nodes[index].path.clone())
                    .collect();
            }
        }

        vec![]
    }

    fn visit(&self, node: usize, colors: &mut [Color], parents: &mut [Option<usize>]) -> Option<Vec<usize>> {
        colors[node] = Color::Gray;

        for &next in &self.nodes[node].edges {
            match colors[next] {
                Color::White => {
                    parents[next] = Some(node);
                    if let Some(cycle) = self.visit(next, colors, parents) {
                        return Some(cycle);
                    }
                }
                Color::Gray => {
                    let mut cycle = vec![node];
                    let mut current = node;
                    while current != next {
                        match parents[current] {
                            Some(parent) => {
                                cycle.push(parent);
                                current = parent;
                            }
                            None => break,
                        }
                    }
                    cycle.reverse();
                    return Some(cycle);
                }
                Color::Black => {}
            }
        }

        colors[node] = Color::Black;
        None
    }
}
