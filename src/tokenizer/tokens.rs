//! Token definitions for the requirement language.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Half-open byte range into the original source string.
///
/// Every token records the range it was scanned from, and every AST node
/// derives its own range from the tokens it was built out of. Ranges are
/// byte indices, so `&source[range.start..range.end]` recovers the exact
/// source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn join(&self, other: SourceRange) -> SourceRange {
        SourceRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The kind of a scanned token.
///
/// `Identifier` covers every unquoted keyword, unquoted string constant,
/// quoted string constant, file path, and integer constant. The
/// tokenizer does not distinguish between them; the parser does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Whitespace,
    Comment,
    HashConstant,
    Identifier,
    Negation,
    Equals,
    LessThan,
    GreaterThan,
    LessEq,
    GreaterEq,
    Wildcard,
    Minus,
    RequirementSetMarker,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
}

/// A single token: its kind, the verbatim source text, and where it came
/// from. The raw text keeps quotes and escape sequences intact so the
/// original spelling can always be reproduced; decoded views are
/// computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: SourceRange,
}

fn unsigned_pattern() -> &'static Regex {
    static UNSIGNED: OnceLock<Regex> = OnceLock::new();
    UNSIGNED.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, range: SourceRange) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True for an `Identifier` token whose raw text is exactly `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == keyword
    }

    /// Decoded string content of an identifier token.
    ///
    /// Quoted constants have their surrounding double quotes removed and
    /// backslash escapes resolved (`\"` becomes `"`, `\\` becomes `\`,
    /// and in general `\c` becomes `c`). Unquoted tokens are returned
    /// verbatim.
    pub fn string_value(&self) -> String {
        if !self.text.starts_with('"') || self.text.len() < 2 {
            return self.text.clone();
        }
        let inner = &self.text[1..self.text.len() - 1];
        let mut decoded = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    decoded.push(escaped);
                }
            } else {
                decoded.push(c);
            }
        }
        decoded
    }

    /// Hex digits of a hash constant, lower-cased for comparison. The
    /// raw `H"..."` spelling stays available through `text`.
    pub fn hash_value(&self) -> Option<String> {
        if self.kind != TokenKind::HashConstant {
            return None;
        }
        Some(self.text[2..self.text.len() - 1].to_ascii_lowercase())
    }

    /// The token's text parsed as an unsigned decimal integer, when it
    /// has that shape.
    pub fn unsigned_value(&self) -> Option<u32> {
        if self.kind != TokenKind::Identifier || !unsigned_pattern().is_match(&self.text) {
            return None;
        }
        self.text.parse().ok()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({:?}, {:?}, {})", self.kind, self.text, self.range)
    }
}
