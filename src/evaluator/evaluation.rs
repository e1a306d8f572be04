//! The evaluation tree and its annotated rendering.

use std::collections::BTreeSet;

use crate::ast::requirement::Requirement;
use crate::ast::treeviz::{branch_prefix, node_signifier};

const SATISFIED_CONSTRAINT: &str = "This constraint is satisfied.";
const SATISFIED_REQUIREMENT: &str = "This requirement is satisfied.";
const UNSATISFIED_REQUIREMENT: &str =
    "This requirement is not satisfied, see child evaluations.";

/// The result of evaluating one requirement node. The tree mirrors the
/// requirement tree exactly: compound nodes carry their child
/// evaluations, constraint leaves carry none.
///
/// Evaluations borrow the requirement they were produced from and live
/// no longer than it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'r> {
    requirement: &'r Requirement,
    satisfied: bool,
    children: Vec<Evaluation<'r>>,
    explanation: String,
}

impl<'r> Evaluation<'r> {
    /// A constraint leaf: satisfied when `outcome` is `Ok`, otherwise
    /// unsatisfied with the carried explanation.
    pub(crate) fn leaf(requirement: &'r Requirement, outcome: Result<(), String>) -> Self {
        match outcome {
            Ok(()) => Self {
                requirement,
                satisfied: true,
                children: Vec::new(),
                explanation: SATISFIED_CONSTRAINT.to_string(),
            },
            Err(explanation) => Self {
                requirement,
                satisfied: false,
                children: Vec::new(),
                explanation,
            },
        }
    }

    /// A compound node over already-evaluated children.
    pub(crate) fn compound(
        requirement: &'r Requirement,
        satisfied: bool,
        children: Vec<Evaluation<'r>>,
    ) -> Self {
        let explanation = if satisfied {
            SATISFIED_REQUIREMENT
        } else {
            UNSATISFIED_REQUIREMENT
        };
        Self {
            requirement,
            satisfied,
            children,
            explanation: explanation.to_string(),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    pub fn requirement(&self) -> &'r Requirement {
        self.requirement
    }

    pub fn children(&self) -> &[Evaluation<'r>] {
        &self.children
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Render the evaluation as an ASCII tree. Every line carries a
    /// ` {true}` or ` {false}` verdict; unsatisfied constraint leaves
    /// get a superscript footnote index, and the footnotes follow the
    /// tree under a `Constraint(s) not satisfied:` header.
    pub fn render(&self) -> String {
        let mut output = String::new();
        let mut open = BTreeSet::new();
        let mut footnotes = Vec::new();
        self.render_node(0, &mut open, true, &mut footnotes, &mut output);

        if !footnotes.is_empty() {
            output.push('\n');
            output.push_str("Constraint(s) not satisfied:\n");
            for (index, explanation) in footnotes.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", index + 1, explanation));
            }
        }
        output
    }

    fn render_node(
        &self,
        depth: usize,
        open: &mut BTreeSet<usize>,
        is_last: bool,
        footnotes: &mut Vec<String>,
        output: &mut String,
    ) {
        output.push_str(&branch_prefix(depth, open, is_last));
        output.push_str(&node_signifier(self.requirement));
        output.push_str(if self.satisfied { " {true}" } else { " {false}" });
        if !self.satisfied && self.requirement.is_constraint() {
            footnotes.push(self.explanation.clone());
            output.push_str(&superscript(footnotes.len()));
        }
        output.push('\n');

        let count = self.children.len();
        for (index, child) in self.children.iter().enumerate() {
            let child_is_last = index + 1 == count;
            if !child_is_last {
                open.insert(depth + 1);
            }
            child.render_node(depth + 1, open, child_is_last, footnotes, output);
            open.remove(&(depth + 1));
        }
    }
}

/// Decimal `n` in Unicode superscript digits.
fn superscript(n: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    n.to_string()
        .chars()
        .map(|c| DIGITS[c.to_digit(10).unwrap() as usize])
        .collect()
}
