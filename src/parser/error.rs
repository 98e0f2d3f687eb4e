use super::locations::Span;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated string starting at {0}")]
    UnterminatedString(Span),
    #[error("malformed number '{0}' at {1}")]
    MalformedNumber(String, Span),
    #[error("identifier '{0}' runs into the end of input at {1}")]
    UnterminatedIdentifier(String, Span),
    #[error("unrecognized character '{0}' at {1}")]
    UnrecognizedCharacter(char, Span),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token '{0}' at {1}")]
    UnexpectedToken(String, Span),
    #[error("cannot assign to '{0}' at {1}")]
    InvalidAssignmentTarget(String, Span),
    #[error("unexpected end of input, expected '{0}'")]
    UnexpectedEndOfInput(String),
    #[error("expression nested more than {0} levels deep at {1}")]
    NestingTooDeep(usize, Span),
}
