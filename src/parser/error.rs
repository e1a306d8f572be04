//! Parser error types.

use serde::Serialize;

/// Unified parser error type. Each variant carries a human-readable
/// description of what was malformed; none of them is recoverable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParserError {
    /// The token list did not reduce to a single requirement.
    Invalid(String),
    /// A token that no construct can start with.
    InvalidToken(String),
    /// Malformed `tag => requirement` structure.
    InvalidRequirementSet(String),
    /// Malformed `[key]` expression.
    InvalidKeyExpr(String),
    /// Malformed match expression.
    InvalidMatchExpr(String),
    /// `and` without a requirement on each side.
    InvalidAnd(String),
    /// `or` without a requirement on each side.
    InvalidOr(String),
    /// `!` without a requirement to negate.
    InvalidNegation(String),
    /// Malformed `identifier` constraint.
    InvalidIdentifier(String),
    /// Malformed `info` or `entitlement` constraint.
    InvalidInfo(String),
    /// Malformed `cdhash` constraint.
    InvalidCodeDirectoryHash(String),
    /// Malformed certificate constraint.
    InvalidCertificate(String),
}

impl ParserError {
    /// The human-readable description carried by every variant.
    pub fn description(&self) -> &str {
        match self {
            ParserError::Invalid(msg)
            | ParserError::InvalidToken(msg)
            | ParserError::InvalidRequirementSet(msg)
            | ParserError::InvalidKeyExpr(msg)
            | ParserError::InvalidMatchExpr(msg)
            | ParserError::InvalidAnd(msg)
            | ParserError::InvalidOr(msg)
            | ParserError::InvalidNegation(msg)
            | ParserError::InvalidIdentifier(msg)
            | ParserError::InvalidInfo(msg)
            | ParserError::InvalidCodeDirectoryHash(msg)
            | ParserError::InvalidCertificate(msg) => msg,
        }
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ParserError::Invalid(_) => "invalid requirement",
            ParserError::InvalidToken(_) => "invalid token",
            ParserError::InvalidRequirementSet(_) => "invalid requirement set",
            ParserError::InvalidKeyExpr(_) => "invalid key expression",
            ParserError::InvalidMatchExpr(_) => "invalid match expression",
            ParserError::InvalidAnd(_) => "invalid and",
            ParserError::InvalidOr(_) => "invalid or",
            ParserError::InvalidNegation(_) => "invalid negation",
            ParserError::InvalidIdentifier(_) => "invalid identifier constraint",
            ParserError::InvalidInfo(_) => "invalid info constraint",
            ParserError::InvalidCodeDirectoryHash(_) => "invalid cdhash constraint",
            ParserError::InvalidCertificate(_) => "invalid certificate constraint",
        };
        write!(f, "{}: {}", kind, self.description())
    }
}

impl std::error::Error for ParserError {}
