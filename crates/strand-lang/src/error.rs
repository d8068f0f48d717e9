//! Front-end error types.

use thiserror::Error;

/// Errors produced while lexing or parsing.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseError {
    /// A character the lexer does not recognise.
    #[error("line {line}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, line: u32 },
    /// A numeric literal that does not parse.
    #[error("line {line}: invalid number '{lexeme}'")]
    InvalidNumber { lexeme: String, line: u32 },
    /// The parser wanted something else here.
    #[error("line {line}: expected {expected}, found '{found}'")]
    Expected {
        expected: String,
        found: String,
        line: u32,
    },
    /// A call target that is not a plain identifier.
    #[error("line {line}: only identifiers can be called")]
    BadCallTarget { line: u32 },
}

/// Errors produced while lowering the AST to bytecode.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CompileError {
    /// Reference to a name that is neither a local nor a global.
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    /// Call to a name that is neither a built-in nor a declared function.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// Call with the wrong number of arguments.
    #[error("{name}() expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Two functions with the same name.
    #[error("duplicate function '{0}'")]
    DuplicateFunction(String),
    /// Function declared inside another function body.
    #[error("function '{0}' declared inside a function body")]
    NestedFunction(String),
}

/// Any front-end failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}
