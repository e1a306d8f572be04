//! Requirement Language Tokenizer
//!
//! This module implements the lexical analysis phase of the requirement
//! parser, converting a requirement string into a stream of tokens.
//!
//! ## Architecture
//!
//! The tokenizer is structured into two components:
//!
//! ### 1. [`tokens`] - Token Definitions
//! - Defines all token kinds (e.g. `Identifier`, `HashConstant`, `Equals`)
//! - Provides the [`Token`] struct with its raw text and source range
//! - Provides [`SourceRange`], a half-open byte range into the source
//!
//! ### 2. [`lexer`] - Scanning Logic
//! - Greedy left-to-right scan trying token rules in a fixed order
//! - Commits to the first rule that matches and advances past it
//! - Reports a [`TokenizationError`] with the failing index when no rule
//!   matches or a committed construct is left unterminated
//!
//! ## Key Properties
//!
//! ### Keyword Blindness
//! The tokenizer knows nothing about keywords. `and`, `or`, `anchor`,
//! `certificate`, `exists` and friends all come out as `Identifier`
//! tokens; telling them apart is syntactic context that belongs to the
//! parser.
//!
//! ### Whitespace and Comments Survive
//! Whitespace and comment tokens are emitted like any other token. The
//! parser filters them out of its working view, which keeps source
//! ranges exact and makes mid-expression comments free:
//!
//! ```text
//! anchor /* note */ apple
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use csreq::tokenizer::{tokenize, TokenKind};
//!
//! let tokens = tokenize(r#"identifier "com.apple.Safari""#).unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Identifier);
//! assert_eq!(tokens[0].text, "identifier");
//! ```

pub mod lexer;
pub mod tokens;


pub use lexer::{tokenize, Lexer, TokenizationError};
pub use tokens::{SourceRange, Token, TokenKind};
