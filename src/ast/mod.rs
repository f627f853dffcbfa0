/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The statement and expression enums
/// - expressions: Definitions for the expression variants
/// - statements: Definitions for the statement variants
/// - types: Declared type tags and operator tags
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
