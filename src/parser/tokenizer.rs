use super::error::LexError;
use super::locations::{Location, Span};
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) span: Span,
}

impl Token {
    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    NUMBER,
    STRING,
    NAME,
    OPERATOR,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    COMMA,
    COLON,
    SEMI,
    EQUAL,
}

impl TokenType {
    /// The source text of a punctuation token type.
    pub(crate) fn as_str(&self) -> &'static str {
        SIMPLE_TOKENS
            .iter()
            .find(|(_, typ)| typ == self)
            .map(|(lexeme, _)| *lexeme)
            .unwrap_or("")
    }
}

const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const LBRACE: (&str, TokenType) = ("{", TokenType::LBRACE);
const RBRACE: (&str, TokenType) = ("}", TokenType::RBRACE);
const COMMA: (&str, TokenType) = (",", TokenType::COMMA);
const COLON: (&str, TokenType) = (":", TokenType::COLON);
const SEMI: (&str, TokenType) = (";", TokenType::SEMI);
const EQUAL: (&str, TokenType) = ("=", TokenType::EQUAL);

const SIMPLE_TOKENS: [(&str, TokenType); 8] = [LPAR, RPAR, LBRACE, RBRACE, COMMA, COLON, SEMI, EQUAL];

const OPERATOR_CHARS: &str = r"\-+*/<>";
const NUMBER_CHARS: &str = r"0-9.";
const NAME_CHARS: &str = r"_a-zA-Z";

const S_WHITESPACE: &str = r"^\s+";
const S_OPERATOR: &str = concatcp!("^[", OPERATOR_CHARS, "]");
const S_STRING_START: &str = r#"^["']"#;
const S_NUMBER: &str = concatcp!("^[", NUMBER_CHARS, "]+");
const S_NAME: &str = concatcp!("^[", NAME_CHARS, "]+");

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_OPERATOR).expect("Error compiling regex."));
static STRING_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_STRING_START).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));

/// Splits source text into tokens. Character classes are tried in a fixed
/// order: whitespace, operators, punctuation, strings, numbers, names.
pub struct Tokenizer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    start: usize,
    location: Location,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: vec![],
            start: 0,
            location: Location::new(1, 1),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let source = self.source;
        while self.start < source.len() {
            let rest = &source[self.start..];

            if let Some(m) = WHITESPACE.find(rest) {
                self.advance(m.as_str());
                continue;
            }
            if let Some(m) = OPERATOR.find(rest) {
                self.push(TokenType::OPERATOR, m.as_str(), m.as_str());
                continue;
            }
            if let Some((lexeme, typ)) = SIMPLE_TOKENS
                .iter()
                .find(|(lexeme, _)| rest.starts_with(lexeme))
            {
                self.push(*typ, lexeme, lexeme);
                continue;
            }
            if STRING_START.is_match(rest) {
                self.scan_string(rest)?;
                continue;
            }
            if let Some(m) = NUMBER.find(rest) {
                self.scan_number(m.as_str())?;
                continue;
            }
            if let Some(m) = NAME.find(rest) {
                self.scan_name(m.as_str())?;
                continue;
            }

            let chr = rest.chars().next().unwrap_or_default();
            return Err(LexError::UnrecognizedCharacter(chr, self.span_of(&rest[..chr.len_utf8()])));
        }
        Ok(self.tokens)
    }

    /// No escape sequences: the string runs up to the next quote of the
    /// same kind as the opening one.
    fn scan_string(&mut self, rest: &str) -> Result<(), LexError> {
        let quote = &rest[..1];
        match rest[1..].find(quote) {
            Some(len) => {
                let raw = &rest[..len + 2];
                self.push(TokenType::STRING, &raw[1..len + 1], raw);
                Ok(())
            }
            None => Err(LexError::UnterminatedString(self.span_of(quote))),
        }
    }

    fn scan_number(&mut self, number: &str) -> Result<(), LexError> {
        let dots = number.chars().filter(|&c| c == '.').count();
        if dots > 1 || self.reaches_end(number) {
            return Err(LexError::MalformedNumber(
                number.to_string(),
                self.span_of(number),
            ));
        }
        self.push(TokenType::NUMBER, number, number);
        Ok(())
    }

    fn scan_name(&mut self, name: &str) -> Result<(), LexError> {
        if self.reaches_end(name) {
            return Err(LexError::UnterminatedIdentifier(
                name.to_string(),
                self.span_of(name),
            ));
        }
        self.push(TokenType::NAME, name, name);
        Ok(())
    }

    fn reaches_end(&self, text: &str) -> bool {
        self.start + text.len() >= self.source.len()
    }

    fn span_of(&self, text: &str) -> Span {
        Span::new(self.location, self.location.advance(text))
    }

    fn advance(&mut self, text: &str) {
        self.start += text.len();
        self.location = self.location.advance(text);
    }

    fn push(&mut self, typ: TokenType, lexeme: &str, raw: &str) {
        let span = self.span_of(raw);
        self.tokens.push(Token {
            typ,
            lexeme: lexeme.to_string(),
            span,
        });
        log::trace!("{} at {}", self.tokens[self.tokens.len() - 1], span);
        self.advance(raw);
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Tokenizer::new(source).tokenize()?;
    log::debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}
