// # GRAMMAR
// # =======
// #
// # One rule is shared by every nesting level; only the tokens that end it
// # differ:
// #
// #   statement:  expression (';' expression)*          (top level)
// #   arguments:  '(' [expression (',' expression)*] ')'
// #   body:       '{' [expression (';' expression)*] '}'
// #
// #   expression: primary postfix*
// #   primary:    NUMBER | STRING | NAME
// #   postfix:    OPERATOR expression        -> Operation (claims the rest of the context)
// #             | arguments                  -> Call
// #             | body                       -> FunctionDefinition (previous node must be a Call)
// #             | '=' expression             -> Assignment (previous node must be a NAME)
// #
// # There is no operator precedence: every operator takes everything up to
// # the end of the current context as its right operand. Each operator, `=`,
// # argument list and body nests one level deeper; nesting is capped at
// # MAX_NESTING.

use super::ast::*;
use super::error::ParseError;
use super::locations::{Locatable, Span};
use super::tokenizer::{Token, TokenType as TT};

type ParseResult<'a, Output> = Result<(Output, &'a [Token]), ParseError>;

pub const MAX_NESTING: usize = 256;

/// The tokens that separate items of a context and the token that closes it.
#[derive(Clone, Copy, Debug)]
struct Context {
    divider: TT,
    end: TT,
}

const STATEMENTS: Context = Context {
    divider: TT::SEMI,
    end: TT::SEMI,
};
const ARGUMENTS: Context = Context {
    divider: TT::COMMA,
    end: TT::RPAR,
};
const BODY: Context = Context {
    divider: TT::SEMI,
    end: TT::RBRACE,
};

impl Context {
    fn stops_at(&self, token: &Token) -> bool {
        token.typ == self.divider || token.typ == self.end
    }
}

/// Parses a whole program: one expression per `;`-separated statement.
/// Empty statements are dropped.
pub fn parse(tokens: &[Token]) -> Result<Vec<Expression>, ParseError> {
    let mut program = vec![];
    let mut input = tokens;
    while !input.is_empty() {
        let (statement, rest) = expression(input, STATEMENTS, 0)?;
        program.extend(statement);
        // `rest` is either exhausted or starts with the `;` that ended the statement.
        input = rest.get(1..).unwrap_or_default();
    }
    log::debug!("parsed {} statements from {} tokens", program.len(), tokens.len());
    Ok(program)
}

// expression: primary postfix*
fn expression(mut input: &[Token], context: Context, depth: usize) -> ParseResult<Option<Expression>> {
    if depth > MAX_NESTING {
        let span = input.first().map(|token| token.span).unwrap_or_default();
        return Err(ParseError::NestingTooDeep(MAX_NESTING, span));
    }
    let mut partial: Option<Expression> = None;
    loop {
        let Some((token, rest)) = input.split_first() else {
            return Ok((partial, input));
        };
        if context.stops_at(token) {
            return Ok((partial, input));
        }

        let (next, rest) = match (token.typ, partial) {
            (TT::NUMBER, None) => (
                Expression::NumberLiteral(token.lexeme.clone(), token.span),
                rest,
            ),
            (TT::STRING, None) => (
                Expression::StringLiteral(token.lexeme.clone(), token.span),
                rest,
            ),
            (TT::NAME, None) => (Expression::Symbol(token.lexeme.clone(), token.span), rest),
            (TT::OPERATOR, Some(left)) => {
                let (right, rest) = operand(rest, context, depth + 1)?;
                let operation = Expression::Operation(
                    token.lexeme.clone(),
                    Box::new(left),
                    Box::new(right),
                    token.span,
                );
                (operation, rest)
            }
            (TT::LPAR, Some(callee)) => {
                let (args, rest, close) = sequence(rest, ARGUMENTS, depth + 1)?;
                let span = callee.span().till(&close);
                (Expression::Call(Box::new(callee), args, span), rest)
            }
            (TT::LBRACE, Some(Expression::Call(callee, params, call_span))) => {
                let name = match *callee {
                    Expression::Symbol(name, span) => Name { name, span },
                    _ => return Err(unexpected(token)),
                };
                let (body, rest, close) = sequence(rest, BODY, depth + 1)?;
                let definition = FunctionDefinition {
                    name,
                    params,
                    body,
                    span: call_span.till(&close),
                };
                (Expression::FunctionDefinition(definition), rest)
            }
            (TT::EQUAL, Some(target)) => {
                let target = match target {
                    Expression::Symbol(name, span) => Name { name, span },
                    other => {
                        return Err(ParseError::InvalidAssignmentTarget(
                            describe(&other),
                            other.span(),
                        ))
                    }
                };
                let (value, rest) = operand(rest, context, depth + 1)?;
                let span = target.span.till(&value);
                (Expression::Assignment(target, Box::new(value), span), rest)
            }
            _ => return Err(unexpected(token)),
        };
        partial = Some(next);
        input = rest;
    }
}

// The right-hand side of an operator or `=`: the rest of the current context.
fn operand(input: &[Token], context: Context, depth: usize) -> ParseResult<Expression> {
    match expression(input, context, depth)? {
        (Some(expr), rest) => Ok((expr, rest)),
        (None, rest) => match rest.first() {
            Some(token) => Err(unexpected(token)),
            None => Err(ParseError::UnexpectedEndOfInput("expression".to_string())),
        },
    }
}

// Items of an argument list or body, consuming the closing token. The span of
// the closing token is returned alongside.
fn sequence(
    mut input: &[Token],
    context: Context,
    depth: usize,
) -> Result<(Vec<Expression>, &[Token], Span), ParseError> {
    let mut items = vec![];
    loop {
        let (item, rest) = expression(input, context, depth)?;
        items.extend(item);
        match rest.split_first() {
            Some((token, rest)) if token.typ == context.end => return Ok((items, rest, token.span)),
            Some((_, rest)) => input = rest,
            None => {
                return Err(ParseError::UnexpectedEndOfInput(
                    context.end.as_str().to_string(),
                ))
            }
        }
    }
}

fn unexpected(token: &Token) -> ParseError {
    let lexeme = match token.typ {
        TT::STRING => format!("\"{}\"", token.lexeme),
        _ => token.lexeme.clone(),
    };
    ParseError::UnexpectedToken(lexeme, token.span)
}

fn describe(expr: &Expression) -> String {
    match expr {
        Expression::NumberLiteral(num, _) => num.clone(),
        Expression::StringLiteral(s, _) => format!("\"{s}\""),
        Expression::Symbol(name, _) => name.clone(),
        Expression::Operation(op, _, _, _) => format!("{op} operation"),
        Expression::Call(..) => "call".to_string(),
        Expression::FunctionDefinition(def) => format!("function {}", def.name()),
        Expression::Assignment(name, _, _) => format!("assignment to {}", name.as_str()),
    }
}
