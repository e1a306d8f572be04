//! AST module for the requirement language.
//!
//! This module defines the typed tree a requirement string parses into.
//! The node set is closed: four compound forms (`and`, `or`, `!`, and
//! parentheses) plus five constraint leaves (identifier, info,
//! entitlement, code directory hash, certificate). Evaluation and
//! rendering are exhaustive matches over these variants, so a missing
//! case is a compile error rather than a runtime surprise.
//!
//! # Token-Level Precision
//!
//! Leaf nodes keep the tokens they were parsed from. That gives every
//! node an exact [`SourceRange`](crate::tokenizer::SourceRange) into the
//! original string and preserves the author's spelling (quoting, `cert`
//! vs `certificate`) for round-trip rendering. Compound nodes derive
//! their range from their children plus their own operator tokens.
//!
//! # Canonical Text
//!
//! Every node has a `text_form()` that is itself valid input. Parsing
//! the text form of a tree yields an equal tree, modulo source ranges;
//! comments and original whitespace are canonicalized away.
//!
//! # Module Organization
//!
//! - [`requirement`] - the [`Requirement`] enum and compound node types
//! - [`constraints`] - the five constraint leaf types
//! - [`match_expr`] - match expressions (`exists`, infix comparisons,
//!   wildcard equality)
//! - [`position`] - certificate chain positions
//! - [`requirement_set`] - tagged requirement collections and
//!   [`ParseResult`]
//! - [`treeviz`] - ASCII tree rendering

pub mod constraints;
pub mod match_expr;
pub mod position;
pub mod requirement;
pub mod requirement_set;
pub mod treeviz;

#[cfg(test)]
mod tests;

pub use constraints::{
    BracketKey, CertificateConstraint, CodeDirectoryHashConstraint, EntitlementConstraint,
    IdentifierConstraint, InfoConstraint,
};
pub use match_expr::{InfixOperator, MatchExpr, WildcardString};
pub use position::CertificatePosition;
pub use requirement::{
    AndRequirement, NegationRequirement, OrRequirement, ParenthesesRequirement, Requirement,
};
pub use requirement_set::{ParseResult, RequirementSet, RequirementTag};
pub use treeviz::render_tree;
