//! Cross-file module support: the import graph and import path resolution.

pub mod graph;
pub mod resolve;

#[cfg(test)]
mod tests;
