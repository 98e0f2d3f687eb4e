use crate::parser::Span;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A name that is bound nowhere in the scope chain.
    #[error("no such variable '{0}' at {1}")]
    UndefinedVariable(String, Span),
    /// Call syntax applied to something that is not a function.
    #[error("{0} is not a function at {1}")]
    NotCallable(String, Span),
    #[error("unknown operation '{0}' at {1}")]
    UnknownOperation(String, Span),
    /// Arithmetic on an operand with no numeric reading (e.g. `undefined - 1`).
    #[error("unsupported operand type for '{0}': {1} at {2}")]
    InvalidOperand(String, &'static str, Span),
    /// A formal parameter that is not a plain name, as in `f(1){ ... }`.
    #[error("parameter of '{0}' must be a name at {1}")]
    InvalidParameter(String, Span),
    #[error("invalid search pattern '{0}': {1}")]
    InvalidPattern(String, String),
    #[error("maximum call depth of {0} exceeded calling '{1}' at {2}")]
    RecursionLimit(usize, String, Span),
    #[error("failed to write output: {0}")]
    Output(String),
}
