//! Public parsing API.
//!
//! Pure functions from requirement text to structured results. This
//! module contains no I/O and no process handling; the CLI layers on
//! top of it.

use crate::ast::requirement_set::ParseResult;
use crate::parser::error::ParserError;
use crate::parser::requirement::parse_tokens;
use crate::tokenizer::lexer::{tokenize, TokenizationError};

/// Why a requirement string failed to parse: the scanner got stuck, or
/// the token stream was grammatically malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Tokenization(TokenizationError),
    Parser(ParserError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Tokenization(error) => write!(f, "{}", error),
            ParseError::Parser(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Tokenization(error) => Some(error),
            ParseError::Parser(error) => Some(error),
        }
    }
}

impl From<TokenizationError> for ParseError {
    fn from(error: TokenizationError) -> Self {
        ParseError::Tokenization(error)
    }
}

impl From<ParserError> for ParseError {
    fn from(error: ParserError) -> Self {
        ParseError::Parser(error)
    }
}

/// Parse a requirement string into a single requirement or a
/// requirement set.
///
/// ```rust
/// use csreq::{parse, ParseResult};
///
/// let result = parse(r#"anchor apple and identifier "com.apple.Safari""#).unwrap();
/// let ParseResult::Requirement(requirement) = result else { panic!() };
/// assert_eq!(
///     requirement.text_form(),
///     r#"anchor apple and identifier "com.apple.Safari""#
/// );
/// ```
pub fn parse(text: &str) -> Result<ParseResult, ParseError> {
    let tokens = tokenize(text)?;
    Ok(parse_tokens(&tokens)?)
}

/// The three-valued outcome of the compile-check shim, mirroring the
/// status codes a numeric host API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    Ok,
    RequirementUnparseable,
    InternalError,
}

/// Check whether `text` would compile as a requirement. Parse failures
/// map to [`CompileStatus::RequirementUnparseable`]; anything that
/// escapes the parser (a bug, not an input problem) is contained and
/// reported as [`CompileStatus::InternalError`].
pub fn compile_check(text: &str) -> CompileStatus {
    let text = text.to_string();
    match std::panic::catch_unwind(move || parse(&text).map(|_| ())) {
        Ok(Ok(())) => CompileStatus::Ok,
        Ok(Err(_)) => CompileStatus::RequirementUnparseable,
        Err(_) => CompileStatus::InternalError,
    }
}
