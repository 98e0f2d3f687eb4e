mod config;
mod interpreter;
mod parser;
mod preprocessor;

use std::{fs, io::Write, path::Path};

pub use config::{Command, Config, DEFAULT_MAIN_FILE};
pub use interpreter::{Env, EvalResult, Function, Interpreter, RuntimeError, Value};
pub use parser::tokenizer::Tokenizer;
pub use parser::{
    parse, tokenize, Expression, FunctionDefinition, LexError, Locatable, Location, Name,
    ParseError, Span, Token, TokenType, MAX_NESTING,
};
pub use preprocessor::{preprocess, PreprocessError};

/// Any failure of the pipeline, from reading the source to evaluating it.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("preprocessing error: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Tokenizes, parses and evaluates `source` with `interpreter`, returning the
/// value of the last statement. No preprocessing is done.
pub fn run_source<W: Write>(interpreter: &mut Interpreter<W>, source: &str) -> Result<Value, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    Ok(interpreter.run(&program)?)
}

/// The whole pipeline for one entry file: preprocess, tokenize, parse and
/// evaluate against a fresh global scope.
pub fn run_file<W: Write>(path: &Path, config: &Config, out: W) -> Result<(), Error> {
    let source = fs::read_to_string(path).map_err(|source| PreprocessError::Io {
        file: path.display().to_string(),
        source,
    })?;
    let source = preprocess(&source, config)?;
    let mut interpreter = Interpreter::from_config(config, out);
    run_source(&mut interpreter, &source)?;
    Ok(())
}
