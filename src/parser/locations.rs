use super::ast::Expression;
use super::tokenizer::Token;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Location {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Location {
    pub(crate) fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The location reached after reading `text` starting from `self`.
    pub(crate) fn advance(self, text: &str) -> Self {
        text.chars().fold(self, |loc, chr| {
            if chr == '\n' {
                Location::new(loc.line + 1, 1)
            } else {
                Location::new(loc.line, loc.column + 1)
            }
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub(crate) start: Location,
    pub(crate) end: Location,
}

impl Span {
    pub(crate) fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub(crate) fn till<R: Locatable>(&self, other: &R) -> Self {
        Self {
            start: self.start,
            end: other.span().end,
        }
    }

    pub fn start(&self) -> Location {
        self.start
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)
    }
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl<R> Locatable for Box<R>
where
    R: Locatable,
{
    fn span(&self) -> Span {
        (**self).span()
    }
}

impl Locatable for Expression {
    fn span(&self) -> Span {
        match self {
            Self::NumberLiteral(_, s) => *s,
            Self::StringLiteral(_, s) => *s,
            Self::Symbol(_, s) => *s,
            Self::Operation(_, l, r, _) => l.span().till(r),
            Self::Call(_, _, s) => *s,
            Self::FunctionDefinition(def) => def.span,
            Self::Assignment(_, _, s) => *s,
        }
    }
}
