mod builtins;
mod environment;
mod error;
mod value;

use std::{
    collections::HashMap,
    io::{self, Stdout, Write},
    rc::Rc,
};

use regex::Regex;

use crate::config::Config;
use crate::parser::{Expression, FunctionDefinition, Locatable, Span};
use builtins::{Builtin, Registry};

pub use environment::Env;
pub use error::RuntimeError;
pub use value::{Function, Value};

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Tree-walking evaluator. `print` writes to `out`.
pub struct Interpreter<W = Stdout> {
    globals: Env,
    builtins: Registry<W>,
    out: W,
    depth: usize,
    max_depth: usize,
    patterns: HashMap<String, Regex>,
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// A fresh global scope in which every builtin name is bound, so that
    /// builtins resolve like any other callable symbol.
    pub fn with_output(out: W) -> Self {
        let builtins = Registry::standard();
        let globals = Env::new();
        for name in builtins.names() {
            globals.bind(name, Value::Function(Rc::new(Function::builtin(name))));
        }
        Self {
            globals,
            builtins,
            out,
            depth: 0,
            max_depth: Config::default().max_call_depth,
            patterns: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config, out: W) -> Self {
        Self::with_output(out).with_max_depth(config.max_call_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Evaluates a program statement by statement in the global scope and
    /// returns the value of the last statement.
    pub fn run(&mut self, program: &[Expression]) -> EvalResult<Value> {
        let globals = self.globals.clone();
        let result = self.evaluate_sequence(program, &globals);
        self.out.flush().map_err(|e| RuntimeError::Output(e.to_string()))?;
        result
    }

    pub fn evaluate(&mut self, expression: &Expression, env: &Env) -> EvalResult<Value> {
        match expression {
            Expression::NumberLiteral(text, _) => Ok(Value::Number(text.parse().unwrap_or(f64::NAN))),
            Expression::StringLiteral(text, _) => Ok(Value::String(text.clone())),
            Expression::Symbol(name, span) => env
                .lookup(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone(), *span)),
            Expression::Operation(op, left, right, span) => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;
                operation(op, left, right, *span)
            }
            Expression::Assignment(target, value, _) => {
                let value = self.evaluate(value, env)?;
                env.bind(target.as_str(), value.clone());
                Ok(value)
            }
            Expression::FunctionDefinition(definition) => self.define(definition, env),
            Expression::Call(callee, args, span) => self.call(callee, args, *span, env),
        }
    }

    /// Evaluates `body` in order and returns the last value; `undefined` if empty.
    pub(crate) fn evaluate_sequence(&mut self, body: &[Expression], env: &Env) -> EvalResult<Value> {
        let mut result = Value::Undefined;
        for expression in body {
            result = self.evaluate(expression, env)?;
        }
        Ok(result)
    }

    fn evaluate_all(&mut self, args: &[Expression], env: &Env) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.evaluate(arg, env)).collect()
    }

    fn define(&mut self, definition: &FunctionDefinition, env: &Env) -> EvalResult<Value> {
        if let Some(Builtin::Special(form)) = self.builtins.get(definition.name()) {
            return form(self, definition.params(), definition.body(), env);
        }

        let params = definition
            .params()
            .iter()
            .map(|param| match param.as_symbol() {
                Some(name) => Ok(name.to_string()),
                None => Err(RuntimeError::InvalidParameter(
                    definition.name().to_string(),
                    param.span(),
                )),
            })
            .collect::<EvalResult<Vec<_>>>()?;

        // The closure scope is captured here, once, and never replaced.
        let function = Value::Function(Rc::new(Function {
            name: definition.name().to_string(),
            params,
            body: definition.body().to_vec(),
            closure: env.child(),
        }));
        env.bind(definition.name(), function.clone());
        Ok(function)
    }

    fn call(&mut self, callee: &Expression, args: &[Expression], span: Span, env: &Env) -> EvalResult<Value> {
        let function = match self.evaluate(callee, env)? {
            Value::Function(function) => function,
            other => return Err(RuntimeError::NotCallable(other.to_code_string(), span)),
        };

        match self.builtins.get(function.name()) {
            Some(Builtin::Special(form)) => form(self, args, &[], env),
            Some(Builtin::Native(native)) => {
                let args = self.evaluate_all(args, env)?;
                native(self, args)
            }
            None => {
                let args = self.evaluate_all(args, env)?;
                self.call_function(&function, args, span)
            }
        }
    }

    fn call_function(&mut self, function: &Function, args: Vec<Value>, span: Span) -> EvalResult<Value> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::RecursionLimit(
                self.max_depth,
                function.name.clone(),
                span,
            ));
        }

        let frame = function.closure.child();
        let mut args = args.into_iter();
        for param in &function.params {
            frame.bind(param.as_str(), args.next().unwrap_or(Value::Undefined));
        }

        self.depth += 1;
        log::trace!("call {} at depth {}", function.name, self.depth);
        let result = self.evaluate_sequence(&function.body, &frame);
        self.depth -= 1;

        // Bindings only ever go into the innermost scope, so after the call
        // nothing but the result can reach the frame. Functions defined in
        // the frame would otherwise keep it alive through their closures.
        if !matches!(&result, Ok(value) if value.captures(&frame)) {
            frame.clear();
        }
        result
    }
}

fn operation(op: &str, left: Value, right: Value, span: Span) -> EvalResult<Value> {
    let number = |value: &Value| {
        value
            .as_number()
            .ok_or_else(|| RuntimeError::InvalidOperand(op.to_string(), value.typename(), span))
    };

    match (op, &left, &right) {
        ("+", Value::String(_), _) | ("+", _, Value::String(_)) => {
            Ok(Value::String(format!("{left}{right}")))
        }
        ("<", Value::String(a), Value::String(b)) => Ok(Value::Boolean(a < b)),
        (">", Value::String(a), Value::String(b)) => Ok(Value::Boolean(a > b)),
        ("+", _, _) => Ok(Value::Number(number(&left)? + number(&right)?)),
        ("-", _, _) => Ok(Value::Number(number(&left)? - number(&right)?)),
        ("*", _, _) => Ok(Value::Number(number(&left)? * number(&right)?)),
        ("/", _, _) => Ok(Value::Number(number(&left)? / number(&right)?)),
        ("<", _, _) => Ok(Value::Boolean(number(&left)? < number(&right)?)),
        (">", _, _) => Ok(Value::Boolean(number(&left)? > number(&right)?)),
        _ => Err(RuntimeError::UnknownOperation(op.to_string(), span)),
    }
}

#[cfg(test)]
mod test;
