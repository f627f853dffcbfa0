//! Unit tests for the import graph and path resolution.

use std::{fs, path::PathBuf};

use super::{
    graph::ImportGraph,
    resolve::{normalize, resolve_with_packages},
};
use crate::ast::statements::BlockStmt;

fn path(name: &str) -> PathBuf {
    PathBuf::from(format!("/modules/{}.etch", name))
}

#[test]
fn test_add_creates_nodes_and_edges() {
    let mut graph = ImportGraph::new();
    graph.add(&path("a"), &path("b"));
    graph.add(&path("b"), &path("c"));
    graph.add(&path("a"), &path("c"));

    let a = graph.index_of(&path("a")).unwrap();
    let b = graph.index_of(&path("b")).unwrap();
    let c = graph.index_of(&path("c")).unwrap();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.node(a).edges.len(), 2);
    assert_eq!(graph.node(b).edges.len(), 1);
    assert_eq!(graph.node(c).edges.len(), 0);
}

#[test]
fn test_add_is_idempotent() {
    let mut graph = ImportGraph::new();
    let first = graph.add(&path("a"), &path("b"));
    let second = graph.add(&path("a"), &path("b"));

    assert_eq!(first, second);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.node(graph.index_of(&path("a")).unwrap()).edges, vec![first]);
}

#[test]
fn test_find_cycles_reports_ordered_path() {
    let mut graph = ImportGraph::new();
    graph.add(&path("a"), &path("b"));
    graph.add(&path("b"), &path("c"));
    graph.add(&path("c"), &path("a"));

    assert_eq!(graph.find_cycles(), vec![path("a"), path("b"), path("c")]);
}

#[test]
fn test_find_cycles_ignores_shared_sink() {
    let mut graph = ImportGraph::new();
    graph.add(&path("a"), &path("b"));
    graph.add(&path("a"), &path("c"));
    graph.add(&path("b"), &path("c"));

    assert!(graph.find_cycles().is_empty());
}

#[test]
fn test_find_cycles_self_import() {
    let mut graph = ImportGraph::new();
    graph.add(&path("a"), &path("a"));

    assert_eq!(graph.find_cycles(), vec![path("a")]);
}

#[test]
fn test_find_cycles_checks_disconnected_components() {
    let mut graph = ImportGraph::new();
    graph.add(&path("main"), &path("lib"));
    graph.add(&path("x"), &path("y"));
    graph.add(&path("y"), &path("x"));

    assert_eq!(graph.find_cycles(), vec![path("x"), path("y")]);
}

#[test]
fn test_module_records() {
    let mut graph = ImportGraph::new();
    graph.insert(&path("a"));
    assert!(graph.module(&path("a")).is_none());

    graph.set_module(&path("a"), BlockStmt { body: vec![] });
    let record = graph.module(&path("a")).unwrap();
    assert!(!record.evaluated);
    assert!(record.exports.is_empty());
    assert_eq!(record.path, path("a"));
}

#[test]
fn test_resolve_relative_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("m.etch"), "").unwrap();

    let resolved = resolve_with_packages(dir.path(), "./m", None);
    assert_eq!(resolved, normalize(&dir.path().join("m.etch")));
}

#[test]
fn test_resolve_directory_uses_same_named_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("util")).unwrap();
    fs::write(dir.path().join("util").join("util.etch"), "").unwrap();

    let resolved = resolve_with_packages(dir.path(), "util", None);
    assert_eq!(resolved, normalize(&dir.path().join("util").join("util.etch")));
}

#[test]
fn test_resolve_prefers_package_root() {
    let project = tempfile::tempdir().unwrap();
    let packages = tempfile::tempdir().unwrap();
    fs::create_dir(packages.path().join("strings")).unwrap();
    fs::write(packages.path().join("strings").join("strings.etch"), "").unwrap();
    fs::write(project.path().join("strings.etch"), "").unwrap();

    let resolved = resolve_with_packages(project.path(), "strings", Some(packages.path()));
    assert_eq!(resolved, normalize(&packages.path().join("strings").join("strings.etch")));
}

#[test]
fn test_resolve_falls_back_when_package_missing() {
    let project = tempfile::tempdir().unwrap();
    let packages = tempfile::tempdir().unwrap();
    fs::write(project.path().join("local.etch"), "").unwrap();

    let resolved = resolve_with_packages(project.path(), "local.etch", Some(packages.path()));
    assert_eq!(resolved, normalize(&project.path().join("local.etch")));
}

#[test]
fn test_normalize_missing_path() {
    assert_eq!(normalize(&PathBuf::from("/nowhere/a/../b/./c.etch")), PathBuf::from("/nowhere/b/c.etch"));
}
