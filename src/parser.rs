//! Requirement Language Parser
//!
//! Turns a token stream into a [`ParseResult`](crate::ast::ParseResult):
//! either a single requirement tree or a tagged requirement set.
//!
//! ## Pipeline
//!
//! 1. Filter whitespace and comment tokens out of the working view.
//! 2. Dispatch: a leading tag keyword (`host`, `guest`, `library`,
//!    `designated`) together with at least one `=>` marker means a
//!    requirement set; anything else is a single requirement.
//! 3. Requirements parse in two phases. The linearize phase scans left
//!    to right, recursing into parentheses and handing anything that is
//!    not `and`, `or`, or `!` to the constraint sub-parsers, producing a
//!    flat list of parsed requirements and operator symbols. The fold
//!    phase then applies precedence: `!` binds tightest, then `and`,
//!    then `or`, all left-associative.
//!
//! ## Keyword Disambiguation
//!
//! Keywords only exist in the parser. A constraint sub-parser claims its
//! leading keyword and either consumes a well-formed constraint or
//! raises a hard error; a token that no sub-parser claims is an
//! [`InvalidToken`](error::ParserError::InvalidToken) error. This is
//! how `anchor` can be both a certificate position and the start of
//! `anchor apple`, and how `17.4` can be a string constant in one spot
//! and a chain position in another.
//!
//! Errors are unrecoverable: the first malformed construct aborts the
//! parse with a [`ParserError`](error::ParserError) describing it.

pub mod constraints;
pub mod error;
pub mod requirement;

#[cfg(test)]
mod tests;

pub use error::ParserError;
pub use requirement::{parse_requirement_tokens, parse_tokens};
