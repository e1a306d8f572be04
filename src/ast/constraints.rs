//! Constraint leaf nodes: the five requirement forms with no child
//! requirements.

use serde::Serialize;

use crate::ast::match_expr::MatchExpr;
use crate::ast::position::CertificatePosition;
use crate::tokenizer::{SourceRange, Token};

/// A bracketed key, `[key]`, as used by info, entitlement, and
/// certificate element constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketKey {
    pub left: Token,
    pub key: Token,
    pub right: Token,
}

impl BracketKey {
    /// The decoded key string.
    pub fn value(&self) -> String {
        self.key.string_value()
    }

    pub fn source_range(&self) -> SourceRange {
        self.left.range.join(self.right.range)
    }

    pub fn text_form(&self) -> String {
        format!("[{}]", self.key.text)
    }
}

/// `identifier "com.apple.Safari"`, with or without an explicit `=`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierConstraint {
    pub keyword: Token,
    /// The `=` token of the explicit equality form, absent for the
    /// implicit form. The two forms mean the same thing.
    pub equals: Option<Token>,
    pub value: Token,
}

impl IdentifierConstraint {
    /// The decoded identifier the subject must match.
    pub fn constant(&self) -> String {
        self.value.string_value()
    }

    pub fn source_range(&self) -> SourceRange {
        self.keyword.range.join(self.value.range)
    }

    pub fn text_form(&self) -> String {
        match &self.equals {
            Some(_) => format!("identifier = {}", self.value.text),
            None => format!("identifier {}", self.value.text),
        }
    }
}

/// `info[key] match`, a constraint over the Info dictionary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoConstraint {
    pub keyword: Token,
    pub key: BracketKey,
    pub match_expr: MatchExpr,
}

impl InfoConstraint {
    pub fn source_range(&self) -> SourceRange {
        self.keyword.range.join(self.match_expr.source_range())
    }

    pub fn text_form(&self) -> String {
        format!(
            "info{} {}",
            self.key.text_form(),
            self.match_expr.text_form()
        )
    }
}

/// `entitlement[key] match`, a constraint over the entitlements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitlementConstraint {
    pub keyword: Token,
    pub key: BracketKey,
    pub match_expr: MatchExpr,
}

impl EntitlementConstraint {
    pub fn source_range(&self) -> SourceRange {
        self.keyword.range.join(self.match_expr.source_range())
    }

    pub fn text_form(&self) -> String {
        format!(
            "entitlement{} {}",
            self.key.text_form(),
            self.match_expr.text_form()
        )
    }
}

/// `cdhash H"..."` or `cdhash path`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CodeDirectoryHashConstraint {
    /// Compare against an inline hash constant.
    HashConstant { keyword: Token, hash: Token },
    /// Compare against the SHA-1 of the named file.
    FilePath { keyword: Token, path: Token },
}

impl CodeDirectoryHashConstraint {
    pub fn source_range(&self) -> SourceRange {
        match self {
            CodeDirectoryHashConstraint::HashConstant { keyword, hash } => {
                keyword.range.join(hash.range)
            }
            CodeDirectoryHashConstraint::FilePath { keyword, path } => {
                keyword.range.join(path.range)
            }
        }
    }

    pub fn text_form(&self) -> String {
        match self {
            CodeDirectoryHashConstraint::HashConstant { hash, .. } => {
                format!("cdhash {}", hash.text)
            }
            CodeDirectoryHashConstraint::FilePath { path, .. } => {
                format!("cdhash {}", path.text)
            }
        }
    }
}

/// Certificate constraints.
///
/// The whole-Apple forms exist only with the literal `anchor` position;
/// `certificate root apple` does not parse. That asymmetry is part of
/// the language, not an accident of this implementation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CertificateConstraint {
    /// `anchor apple`.
    WholeApple {
        position: CertificatePosition,
        apple: Token,
    },
    /// `anchor apple generic`.
    WholeAppleGeneric {
        position: CertificatePosition,
        apple: Token,
        generic: Token,
    },
    /// `position = H"..."`.
    WholeHashConstant {
        position: CertificatePosition,
        equals: Token,
        hash: Token,
    },
    /// `position = path`.
    WholeHashFilePath {
        position: CertificatePosition,
        equals: Token,
        path: Token,
    },
    /// `position[key] match`.
    Element {
        position: CertificatePosition,
        key: BracketKey,
        match_expr: MatchExpr,
    },
    /// `position[key]` with no match: an existence check.
    ElementImplicitExists {
        position: CertificatePosition,
        key: BracketKey,
    },
    /// `position trusted`.
    Trusted {
        position: CertificatePosition,
        trusted: Token,
    },
}

impl CertificateConstraint {
    pub fn position(&self) -> &CertificatePosition {
        match self {
            CertificateConstraint::WholeApple { position, .. }
            | CertificateConstraint::WholeAppleGeneric { position, .. }
            | CertificateConstraint::WholeHashConstant { position, .. }
            | CertificateConstraint::WholeHashFilePath { position, .. }
            | CertificateConstraint::Element { position, .. }
            | CertificateConstraint::ElementImplicitExists { position, .. }
            | CertificateConstraint::Trusted { position, .. } => position,
        }
    }

    pub fn source_range(&self) -> SourceRange {
        let start = self.position().source_range();
        match self {
            CertificateConstraint::WholeApple { apple, .. } => start.join(apple.range),
            CertificateConstraint::WholeAppleGeneric { generic, .. } => start.join(generic.range),
            CertificateConstraint::WholeHashConstant { hash, .. } => start.join(hash.range),
            CertificateConstraint::WholeHashFilePath { path, .. } => start.join(path.range),
            CertificateConstraint::Element { match_expr, .. } => {
                start.join(match_expr.source_range())
            }
            CertificateConstraint::ElementImplicitExists { key, .. } => {
                start.join(key.source_range())
            }
            CertificateConstraint::Trusted { trusted, .. } => start.join(trusted.range),
        }
    }

    pub fn text_form(&self) -> String {
        let position = self.position().text_form();
        match self {
            CertificateConstraint::WholeApple { .. } => format!("{position} apple"),
            CertificateConstraint::WholeAppleGeneric { .. } => {
                format!("{position} apple generic")
            }
            CertificateConstraint::WholeHashConstant { hash, .. } => {
                format!("{position} = {}", hash.text)
            }
            CertificateConstraint::WholeHashFilePath { path, .. } => {
                format!("{position} = {}", path.text)
            }
            CertificateConstraint::Element {
                key, match_expr, ..
            } => format!("{position}{} {}", key.text_form(), match_expr.text_form()),
            CertificateConstraint::ElementImplicitExists { key, .. } => {
                format!("{position}{}", key.text_form())
            }
            CertificateConstraint::Trusted { .. } => format!("{position} trusted"),
        }
    }
}
