use std::{collections::HashMap, io::Write};

use regex::Regex;

use super::{Env, EvalResult, Interpreter, RuntimeError, Value};
use crate::parser::Expression;

/// Receives the already evaluated arguments.
pub(crate) type NativeFn<W> = fn(&mut Interpreter<W>, Vec<Value>) -> EvalResult<Value>;

/// Receives the argument expressions unevaluated, the `{}` body when invoked
/// in block form (empty otherwise), and the caller's scope.
pub(crate) type SpecialFn<W> =
    fn(&mut Interpreter<W>, &[Expression], &[Expression], &Env) -> EvalResult<Value>;

pub(crate) enum Builtin<W> {
    Native(NativeFn<W>),
    Special(SpecialFn<W>),
}

impl<W> Clone for Builtin<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for Builtin<W> {}

/// Builtins by name. A call whose callee carries one of these names is
/// handed to the native implementation instead of the generic call path.
pub(crate) struct Registry<W> {
    entries: HashMap<&'static str, Builtin<W>>,
}

impl<W: Write> Registry<W> {
    pub(crate) fn standard() -> Self {
        let mut entries: HashMap<&'static str, Builtin<W>> = HashMap::new();
        entries.insert("print", Builtin::Native(print));
        entries.insert("searchIndexes", Builtin::Native(search_indexes));
        entries.insert("searchElements", Builtin::Native(search_elements));
        entries.insert("indexAccess", Builtin::Native(index_access));
        entries.insert("indexCount", Builtin::Native(index_count));
        entries.insert("if", Builtin::Special(if_));
        entries.insert("ifLoop", Builtin::Special(if_loop));
        Self { entries }
    }
}

impl<W> Registry<W> {
    pub(crate) fn get(&self, name: &str) -> Option<Builtin<W>> {
        self.entries.get(name).copied()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

impl<W: Write> Interpreter<W> {
    fn pattern(&mut self, source: &str) -> EvalResult<Regex> {
        if let Some(regex) = self.patterns.get(source) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(source)
            .map_err(|e| RuntimeError::InvalidPattern(source.to_string(), e.to_string()))?;
        self.patterns.insert(source.to_string(), regex.clone());
        Ok(regex)
    }
}

fn print<W: Write>(interpreter: &mut Interpreter<W>, args: Vec<Value>) -> EvalResult<Value> {
    for arg in args {
        writeln!(interpreter.out, "{arg}").map_err(|e| RuntimeError::Output(e.to_string()))?;
    }
    Ok(Value::Undefined)
}

// Pattern and subject of a search builtin, or `None` if the subject is missing.
fn search_args(args: &[Value]) -> Option<(String, String)> {
    match args {
        [_] | [] => None,
        [_, Value::Undefined, ..] => None,
        [pattern, subject, ..] => Some((pattern.to_string(), subject.to_string())),
    }
}

/// Start offsets, counted in characters, of every non-overlapping match.
fn search_indexes<W: Write>(interpreter: &mut Interpreter<W>, args: Vec<Value>) -> EvalResult<Value> {
    let Some((pattern, subject)) = search_args(&args) else {
        return Ok(Value::Undefined);
    };
    let regex = interpreter.pattern(&pattern)?;
    let offsets = regex
        .find_iter(&subject)
        .map(|m| Value::Number(subject[..m.start()].chars().count() as f64))
        .collect();
    Ok(Value::List(offsets))
}

fn search_elements<W: Write>(interpreter: &mut Interpreter<W>, args: Vec<Value>) -> EvalResult<Value> {
    let Some((pattern, subject)) = search_args(&args) else {
        return Ok(Value::Undefined);
    };
    let regex = interpreter.pattern(&pattern)?;
    let found: Vec<Value> = regex
        .find_iter(&subject)
        .map(|m| Value::string(m.as_str()))
        .collect();
    if found.is_empty() {
        Ok(Value::Undefined)
    } else {
        Ok(Value::List(found))
    }
}

fn index_access<W: Write>(_: &mut Interpreter<W>, args: Vec<Value>) -> EvalResult<Value> {
    let index = match args.get(1).and_then(Value::as_number) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => n as usize,
        _ => return Ok(Value::Undefined),
    };
    let element = match args.first() {
        Some(Value::String(s)) => s.chars().nth(index).map(|c| Value::String(c.to_string())),
        Some(Value::List(items)) => items.get(index).cloned(),
        _ => None,
    };
    Ok(element.unwrap_or(Value::Undefined))
}

fn index_count<W: Write>(_: &mut Interpreter<W>, args: Vec<Value>) -> EvalResult<Value> {
    let count = match args.first() {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::List(items)) => items.len(),
        _ => 0,
    };
    if count == 0 {
        Ok(Value::Undefined)
    } else {
        Ok(Value::Number(count as f64))
    }
}

// if(condition, then, else) or if(condition, else){ then... }
fn if_<W: Write>(
    interpreter: &mut Interpreter<W>,
    args: &[Expression],
    body: &[Expression],
    env: &Env,
) -> EvalResult<Value> {
    let Some(condition) = args.first() else {
        return Ok(Value::Undefined);
    };
    let truthy = interpreter.evaluate(condition, env)?.is_truthy();
    let branch = match (body.is_empty(), truthy) {
        (false, true) => return interpreter.evaluate_sequence(body, env),
        (false, false) => args.get(1),
        (true, true) => args.get(1),
        (true, false) => args.get(2),
    };
    match branch {
        Some(expr) => interpreter.evaluate(expr, env),
        None => Ok(Value::Undefined),
    }
}

// ifLoop(condition, body...) or ifLoop(condition){ body... }
fn if_loop<W: Write>(
    interpreter: &mut Interpreter<W>,
    args: &[Expression],
    body: &[Expression],
    env: &Env,
) -> EvalResult<Value> {
    let Some((condition, rest)) = args.split_first() else {
        return Ok(Value::Undefined);
    };
    let body = if body.is_empty() { rest } else { body };
    let mut iterations = 0usize;
    while interpreter.evaluate(condition, env)?.is_truthy() {
        interpreter.evaluate_sequence(body, env)?;
        iterations += 1;
    }
    log::trace!("ifLoop finished after {iterations} iterations");
    Ok(Value::Undefined)
}
