//! Greedy scanner for the requirement language.
//!
//! The scanner walks the source left to right. At each position it tries
//! the token rules in a fixed order and commits to the first one that
//! matches. Rules that consume a committed prefix (`/*`, `H"`, `"`)
//! must find their terminator; failing to do so is a hard error rather
//! than a fallthrough to the next rule.

use crate::tokenizer::tokens::{SourceRange, Token, TokenKind};

/// Tokenize a requirement string.
///
/// Returns the full token stream, whitespace and comments included, or a
/// [`TokenizationError`] carrying the byte index at which scanning got
/// stuck.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizationError> {
    Lexer::new(source).tokenize()
}

/// Error produced when the scanner cannot make progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizationError {
    /// The complete input that was being tokenized.
    pub source: String,
    /// Byte index of the first character that could not be consumed.
    pub failure_index: usize,
}

impl TokenizationError {
    /// The tail of the input starting at the failure point.
    pub fn untokenized_portion(&self) -> &str {
        &self.source[self.failure_index..]
    }

    /// A static hint keyed off the shape of the untokenized portion.
    pub fn debug_guidance(&self) -> &'static str {
        let portion = self.untokenized_portion();
        if portion.starts_with("/*") {
            "block comments opened with /* must be terminated with */"
        } else if portion.starts_with("//") {
            "line comments extend to the end of the line"
        } else if portion.starts_with("H\"") {
            "hash constants are H\" followed by hex digits and a closing double quote"
        } else if portion.starts_with('"') {
            "quoted strings must be terminated with an unescaped closing double quote"
        } else if portion.starts_with('/') {
            "unquoted file paths may only contain letters, digits, periods, and slashes"
        } else {
            "no token rule matches this character"
        }
    }
}

impl std::fmt::Display for TokenizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tokenization failed at index {}: {}",
            self.failure_index,
            self.debug_guidance()
        )
    }
}

impl std::error::Error for TokenizationError {}

/// Operator spellings, longest first where a prefix collision exists
/// (`=>` before `=`, `<=` before `<`, `>=` before `>`).
const OPERATORS: &[(&str, TokenKind)] = &[
    ("=>", TokenKind::RequirementSetMarker),
    ("<=", TokenKind::LessEq),
    (">=", TokenKind::GreaterEq),
    ("!", TokenKind::Negation),
    ("=", TokenKind::Equals),
    ("<", TokenKind::LessThan),
    (">", TokenKind::GreaterThan),
    ("*", TokenKind::Wildcard),
    ("-", TokenKind::Minus),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
];

/// Scanner state: the source string and a byte cursor into it.
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Run the scanner to completion.
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizationError> {
        let mut tokens = Vec::new();
        while self.position < self.source.len() {
            if let Some(token) = self.read_whitespace() {
                tokens.push(token);
            } else if let Some(token) = self.read_comment()? {
                tokens.push(token);
            } else if let Some(token) = self.read_hash_constant()? {
                tokens.push(token);
            } else if let Some(token) = self.read_identifier()? {
                tokens.push(token);
            } else if let Some(token) = self.read_operator() {
                tokens.push(token);
            } else {
                return Err(self.error_at(self.position));
            }
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error_at(&self, index: usize) -> TokenizationError {
        TokenizationError {
            source: self.source.to_string(),
            failure_index: index,
        }
    }

    fn token_from(&mut self, kind: TokenKind, start: usize, end: usize) -> Token {
        self.position = end;
        Token::new(kind, &self.source[start..end], SourceRange::new(start, end))
    }

    /// One whitespace character per token.
    fn read_whitespace(&mut self) -> Option<Token> {
        match self.peek() {
            Some(c @ (' ' | '\t' | '\n')) => {
                let start = self.position;
                Some(self.token_from(TokenKind::Whitespace, start, start + c.len_utf8()))
            }
            _ => None,
        }
    }

    /// `// ...` to end of line inclusive, or a `/* ... */` block.
    /// Block comments do not nest and must be terminated.
    fn read_comment(&mut self) -> Result<Option<Token>, TokenizationError> {
        let start = self.position;
        if self.rest().starts_with("//") {
            let end = match self.rest().find('\n') {
                Some(offset) => start + offset + 1,
                None => self.source.len(),
            };
            return Ok(Some(self.token_from(TokenKind::Comment, start, end)));
        }
        if self.rest().starts_with("/*") {
            let body = &self.rest()[2..];
            let Some(offset) = body.find("*/") else {
                return Err(self.error_at(start));
            };
            let end = start + 2 + offset + 2;
            return Ok(Some(self.token_from(TokenKind::Comment, start, end)));
        }
        Ok(None)
    }

    /// `H"` followed by hex digits and a closing quote. Once the `H"`
    /// prefix is seen the rule is committed: a non-hex character or a
    /// missing quote fails the whole scan.
    fn read_hash_constant(&mut self) -> Result<Option<Token>, TokenizationError> {
        let start = self.position;
        if !self.rest().starts_with("H\"") {
            return Ok(None);
        }
        let mut cursor = start + 2;
        while let Some(c) = self.source[cursor..].chars().next() {
            if c.is_ascii_hexdigit() {
                cursor += c.len_utf8();
            } else {
                break;
            }
        }
        if self.source[cursor..].starts_with('"') {
            Ok(Some(self.token_from(
                TokenKind::HashConstant,
                start,
                cursor + 1,
            )))
        } else {
            Err(self.error_at(start))
        }
    }

    /// The identifier rule covers quoted strings, unquoted absolute
    /// paths, and unquoted runs of letters, digits, and periods.
    fn read_identifier(&mut self) -> Result<Option<Token>, TokenizationError> {
        let start = self.position;
        match self.peek() {
            Some('"') => {
                let mut chars = self.rest().char_indices().skip(1);
                while let Some((offset, c)) = chars.next() {
                    match c {
                        // A backslash takes the next character literally
                        // and never terminates the string.
                        '\\' => {
                            if chars.next().is_none() {
                                return Err(self.error_at(start));
                            }
                        }
                        '"' => {
                            let end = start + offset + 1;
                            return Ok(Some(self.token_from(TokenKind::Identifier, start, end)));
                        }
                        _ => {}
                    }
                }
                Err(self.error_at(start))
            }
            Some('/') => {
                let mut end = start + 1;
                end += run_length(&self.source[end..], |c| {
                    c.is_alphanumeric() || c == '.' || c == '/'
                });
                Ok(Some(self.token_from(TokenKind::Identifier, start, end)))
            }
            Some(c) if c.is_alphanumeric() || c == '.' => {
                let end = start + run_length(self.rest(), |c| c.is_alphanumeric() || c == '.');
                Ok(Some(self.token_from(TokenKind::Identifier, start, end)))
            }
            _ => Ok(None),
        }
    }

    fn read_operator(&mut self) -> Option<Token> {
        let start = self.position;
        for (spelling, kind) in OPERATORS {
            if self.rest().starts_with(spelling) {
                return Some(self.token_from(*kind, start, start + spelling.len()));
            }
        }
        None
    }
}

/// Byte length of the leading run of characters satisfying `predicate`.
fn run_length(text: &str, predicate: impl Fn(char) -> bool) -> usize {
    text.char_indices()
        .find(|&(_, c)| !predicate(c))
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
