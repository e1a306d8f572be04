//! csreq - Code Signing Requirement Language
//!
//! A parser, AST, and explanatory evaluator for the requirement
//! language used to express constraints over signed executable
//! artifacts, e.g.
//!
//! ```text
//! anchor apple generic and certificate leaf[subject.OU] = "K36BKF7T3D"
//! ```
//!
//! # Pipeline
//!
//! 1. [`tokenizer`] scans the string into tokens with exact source
//!    ranges.
//! 2. [`parser`] turns the token stream into a typed [`ast`] tree (a
//!    single requirement or a `tag => requirement` set).
//! 3. [`evaluator`] walks a tree against a [`Subject`] (a host-provided
//!    view of a signed artifact) and produces a mirror-shaped
//!    evaluation tree with per-node verdicts and per-leaf explanations.
//!
//! Trees render as canonical text (`text_form`, reparseable) or as
//! ASCII trees ([`ast::treeviz`], [`Evaluation::render`]).
//!
//! # Example
//!
//! ```rust
//! use csreq::{evaluate, parse, ParseResult};
//! use csreq::host::StaticSubject;
//!
//! let result = parse(r#"identifier "com.apple.Safari""#).unwrap();
//! let ParseResult::Requirement(requirement) = result else { panic!() };
//!
//! let subject = StaticSubject::new().with_identifier("com.apple.Safari");
//! let evaluation = evaluate(&requirement, &subject).unwrap();
//! assert!(evaluation.is_satisfied());
//! ```

pub mod api;
pub mod ast;
pub mod evaluator;
pub mod host;
pub mod parser;
pub mod tokenizer;

pub use api::{compile_check, parse, CompileStatus, ParseError};
pub use ast::{ParseResult, Requirement, RequirementSet, RequirementTag};
pub use evaluator::{evaluate, Certificate, EvalError, Evaluation, Subject, ValidityCheck, Value};
pub use tokenizer::{tokenize, SourceRange, Token, TokenKind, TokenizationError};
