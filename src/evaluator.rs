//! Requirement Evaluator
//!
//! Walks a requirement tree against a [`Subject`] (a host-provided view
//! of a signed artifact) and produces an [`Evaluation`] tree of the same
//! shape, with a satisfied/not-satisfied verdict at every node and a
//! human-readable explanation at every unsatisfied leaf.
//!
//! ## Explanatory, Not Short-Circuiting
//!
//! Both branches of `and` and `or` are always evaluated. Evaluation
//! exists to explain the verdict; short-circuiting would leave nothing
//! to say about the skipped side.
//!
//! ## Failure Policy
//!
//! Malformed or missing subject data (absent identifier, wrong value
//! type, out-of-range chain position, unreadable hash file) is never an
//! error: it is an unsatisfied leaf with an explanation. The only
//! errors that surface to the caller are host-environment failures
//! reported by [`Subject::check_validity`].
//!
//! ## Division of Labor with the Host
//!
//! `anchor apple` and `... trusted` depend on platform trust stores the
//! core cannot replicate; they delegate to the host through
//! [`Subject::check_validity`]. Everything else (hash comparison,
//! subject fields, numeric-aware string matching, the accepted Apple
//! root table behind `anchor apple generic`) is evaluated directly.

pub mod apple_roots;
pub mod evaluate;
pub mod evaluation;
pub mod match_eval;
pub mod subject;

#[cfg(test)]
mod tests;

pub use evaluate::{evaluate, EvalError};
pub use evaluation::Evaluation;
pub use match_eval::numeric_compare;
pub use subject::{Certificate, Subject, ValidityCheck, Value};
