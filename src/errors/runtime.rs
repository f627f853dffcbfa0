use thiserror::Error;

/// Evaluation failures. The first one raised aborts the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("type mismatch: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("operator '{operator}' is not supported between {left} and {right}")]
    UnsupportedOperation { operator: String, left: String, right: String },
    #[error("'{name}' was not declared")]
    UndeclaredVariable { name: String },
    #[error("'{name}' is already declared in this scope")]
    AlreadyDeclared { name: String },
    #[error("{callee} is not a function")]
    NotCallable { callee: String },
    #[error("{function} expects {expected} argument(s), received {received}")]
    ArityMismatch { function: String, expected: usize, received: usize },
    #[error("division by zero in '{operator}'")]
    DivisionByZero { operator: String },
    #[error("index {index} is out of range for length {length}")]
    IndexOutOfRange { index: String, length: usize },
    #[error("{statement} condition must be a bool, received {received}")]
    NonBooleanCondition { statement: String, received: String },
    #[error("cannot iterate over {received}")]
    NotIterable { received: String },
    #[error("{receiver} has no member '{member}'")]
    UnknownMember { member: String, receiver: String },
    #[error("invalid argument to {function}: {message}")]
    InvalidArgument { function: String, message: String },
    #[error("the function passed to {method} must not return void")]
    VoidCallback { method: String },
    #[error("left side of '{operator}' must be an identifier")]
    InvalidAssignmentTarget { operator: String },
    #[error("symbol '{symbol}' is not exported from {module}")]
    MissingExport { symbol: String, module: String },
    #[error("module {module} was never loaded")]
    ModuleNotLoaded { module: String },
    #[error("{statement} is only allowed at the top level of a module")]
    MisplacedModuleStatement { statement: String },
    #[error("cannot evaluate a statement that failed to parse")]
    UnparsedStatement,
    #[error("error reading input: {reason}")]
    Input { reason: String },
    #[error("error writing output: {reason}")]
    Output { reason: String },
}
