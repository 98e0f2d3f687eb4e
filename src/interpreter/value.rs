use std::{fmt::Display, rc::Rc};

use derivative::Derivative;

use super::environment::Env;
use crate::parser::Expression;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    /// Result of `<` and `>`; counts as 1 or 0 in arithmetic.
    Boolean(bool),
    String(String),
    /// Ordered results of the search builtins.
    List(Vec<Value>),
    Function(Rc<Function>),
    Undefined,
}

impl Value {
    pub fn string<A: AsRef<str>>(s: A) -> Value {
        Value::String(s.as_ref().to_owned())
    }

    pub fn typename(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Undefined => "undefined",
        }
    }

    /// Only `false` and `0` are false. `undefined` is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    /// The numeric reading of a value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Whether a function in this value closes over `scope`.
    pub(crate) fn captures(&self, scope: &Env) -> bool {
        match self {
            Value::Function(function) => function.closure.is_within(scope),
            Value::List(items) => items.iter().any(|item| item.captures(scope)),
            _ => false,
        }
    }

    /// Like `to_string`, but strings are quoted. Used for list elements and
    /// for echoing results in the REPL.
    pub fn to_code_string(&self) -> String {
        match self {
            Value::String(s) => format!("\"{s}\""),
            value => value.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(Value::to_code_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

/// A function value. `closure` is the scope captured when the definition was
/// evaluated; every call frame is a child of it.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Function {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Vec<Expression>,
    #[derivative(Debug = "ignore")]
    pub(crate) closure: Env,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn closure(&self) -> &Env {
        &self.closure
    }

    /// Stand-in bound in the global scope for a builtin, so that the builtin's
    /// name resolves to something callable.
    pub(crate) fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: vec![],
            body: vec![],
            closure: Env::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(
            Value::List(vec![Value::string("ll"), Value::Number(3.0)]).to_string(),
            "[\"ll\", 3]"
        );
        assert_eq!(
            Value::Function(Rc::new(Function::builtin("print"))).to_string(),
            "<function print>"
        );
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Undefined.is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = Rc::new(Function::builtin("f"));
        let g = Rc::new(Function::builtin("f"));
        assert_eq!(Value::Function(f.clone()), Value::Function(f.clone()));
        assert!(Value::Function(f) != Value::Function(g));
    }
}
