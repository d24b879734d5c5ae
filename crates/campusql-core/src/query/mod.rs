/// Query engine module
///
/// JSON query compilation, validation and execution.
/// Aggregate functions
pub mod aggregate;
/// Abstract Syntax Tree types
#[allow(missing_docs)]
pub mod ast;
/// Query compiler
pub mod compiler;
/// Query executor
pub mod executor;
/// WHERE compiler
pub mod filter;
/// Key parsing
pub mod keys;
/// OPTIONS and TRANSFORMATIONS compilers
pub mod options;
/// Kind validator
pub mod validator;

// Re-export main types
pub use ast::*;
pub use compiler::{compile, compile_str, Compiler};
pub use executor::{execute, Executor, ResultRow, ValueComparator};
pub use validator::validate_kind;
