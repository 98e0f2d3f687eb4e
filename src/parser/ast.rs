use super::locations::Span;

/// One node of the expression tree. Every statement of a program is a
/// single `Expression`.
#[derive(Clone, PartialEq)]
pub enum Expression {
    NumberLiteral(String, Span),
    StringLiteral(String, Span),
    Symbol(String, Span),
    /// Binary operator, its left and right operand, and the span of the operator.
    Operation(String, Box<Expression>, Box<Expression>, Span),
    Call(Box<Expression>, Vec<Expression>, Span),
    FunctionDefinition(FunctionDefinition),
    Assignment(Name, Box<Expression>, Span),
}

impl Expression {
    /// The name of a `Symbol` node.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name, _) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Name {
    pub(crate) name: String,
    pub(crate) span: Span,
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name(\"{}\")", self.name)
    }
}

/// `name(params...){ body... }`. The parameters are kept as expressions:
/// for ordinary functions they are symbols, for block-form special forms
/// such as `ifLoop(i < 3){ ... }` they are arbitrary expressions.
#[derive(Clone, PartialEq)]
pub struct FunctionDefinition {
    pub(crate) name: Name,
    pub(crate) params: Vec<Expression>,
    pub(crate) body: Vec<Expression>,
    pub(crate) span: Span,
}

impl FunctionDefinition {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn params(&self) -> &[Expression] {
        &self.params
    }

    pub fn body(&self) -> &[Expression] {
        &self.body
    }
}

impl std::fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish()
    }
}

// Spans are left out so that trees print the same wherever they came from.
impl std::fmt::Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NumberLiteral(num, _) => write!(f, "Number({num})"),
            Self::StringLiteral(s, _) => write!(f, "String({s:?})"),
            Self::Symbol(name, _) => write!(f, "Symbol({name:?})"),
            Self::Operation(op, left, right, _) => {
                write!(f, "Operation({op:?}, {left:?}, {right:?})")
            }
            Self::Call(callee, args, _) => write!(f, "Call({callee:?}, {args:?})"),
            Self::FunctionDefinition(def) => write!(f, "{def:?}"),
            Self::Assignment(target, value, _) => write!(f, "Assignment({target:?}, {value:?})"),
        }
    }
}
