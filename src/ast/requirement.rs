//! The requirement tree and its compound node types.

use serde::Serialize;

use crate::ast::constraints::{
    CertificateConstraint, CodeDirectoryHashConstraint, EntitlementConstraint,
    IdentifierConstraint, InfoConstraint,
};
use crate::tokenizer::{SourceRange, Token};

/// A requirement: a boolean condition over a signed artifact.
///
/// Compound variants combine child requirements; the remaining variants
/// are constraint leaves with no child requirements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Requirement {
    And(AndRequirement),
    Or(OrRequirement),
    Negation(NegationRequirement),
    Parentheses(ParenthesesRequirement),
    Identifier(IdentifierConstraint),
    Info(InfoConstraint),
    Entitlement(EntitlementConstraint),
    CodeDirectoryHash(CodeDirectoryHashConstraint),
    Certificate(CertificateConstraint),
}

/// Conjunction of two requirements, written `lhs and rhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndRequirement {
    pub lhs: Box<Requirement>,
    pub keyword: Token,
    pub rhs: Box<Requirement>,
}

/// Disjunction of two requirements, written `lhs or rhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrRequirement {
    pub lhs: Box<Requirement>,
    pub keyword: Token,
    pub rhs: Box<Requirement>,
}

/// Logical negation, written `! child`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegationRequirement {
    pub negation: Token,
    pub child: Box<Requirement>,
}

/// An explicitly parenthesized requirement. Kept as its own node so the
/// printed tree matches what the author wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenthesesRequirement {
    pub left: Token,
    pub child: Box<Requirement>,
    pub right: Token,
}

impl Requirement {
    /// True for the constraint leaves, false for the compound forms.
    pub fn is_constraint(&self) -> bool {
        !matches!(
            self,
            Requirement::And(_)
                | Requirement::Or(_)
                | Requirement::Negation(_)
                | Requirement::Parentheses(_)
        )
    }

    /// Child requirements in document order. Constraints have none.
    pub fn children(&self) -> Vec<&Requirement> {
        match self {
            Requirement::And(node) => vec![&*node.lhs, &*node.rhs],
            Requirement::Or(node) => vec![&*node.lhs, &*node.rhs],
            Requirement::Negation(node) => vec![&*node.child],
            Requirement::Parentheses(node) => vec![&*node.child],
            _ => Vec::new(),
        }
    }

    /// The span of source this node was parsed from. Surrounding
    /// whitespace and comments are excluded; interior ones fall inside
    /// the range by construction.
    pub fn source_range(&self) -> SourceRange {
        match self {
            Requirement::And(node) => node.lhs.source_range().join(node.rhs.source_range()),
            Requirement::Or(node) => node.lhs.source_range().join(node.rhs.source_range()),
            Requirement::Negation(node) => {
                node.negation.range.join(node.child.source_range())
            }
            Requirement::Parentheses(node) => node.left.range.join(node.right.range),
            Requirement::Identifier(node) => node.source_range(),
            Requirement::Info(node) => node.source_range(),
            Requirement::Entitlement(node) => node.source_range(),
            Requirement::CodeDirectoryHash(node) => node.source_range(),
            Requirement::Certificate(node) => node.source_range(),
        }
    }

    /// Canonical text: valid input that parses back to an equal tree.
    pub fn text_form(&self) -> String {
        match self {
            Requirement::And(node) => {
                format!("{} and {}", node.lhs.text_form(), node.rhs.text_form())
            }
            Requirement::Or(node) => {
                format!("{} or {}", node.lhs.text_form(), node.rhs.text_form())
            }
            Requirement::Negation(node) => format!("! {}", node.child.text_form()),
            Requirement::Parentheses(node) => format!("({})", node.child.text_form()),
            Requirement::Identifier(node) => node.text_form(),
            Requirement::Info(node) => node.text_form(),
            Requirement::Entitlement(node) => node.text_form(),
            Requirement::CodeDirectoryHash(node) => node.text_form(),
            Requirement::Certificate(node) => node.text_form(),
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text_form())
    }
}
