//! Match expression evaluation: existence checks, numeric-aware string
//! comparison, and wildcard matching.

use std::cmp::Ordering;

use crate::ast::match_expr::{InfixOperator, MatchExpr, WildcardString};
use crate::evaluator::subject::Value;

const NOT_PRESENT: &str = "Value not present.";

/// Evaluate a match expression against an optional dynamic value.
/// `Ok(())` is satisfied; `Err` carries the explanation.
pub(crate) fn evaluate_match(expr: &MatchExpr, value: Option<&Value>) -> Result<(), String> {
    match expr {
        MatchExpr::UnarySuffixExists { .. } => evaluate_exists(value),
        MatchExpr::Infix {
            operator,
            value: expected,
            ..
        } => {
            let Some(actual) = value else {
                return Err(NOT_PRESENT.to_string());
            };
            let Some(actual) = actual.as_string() else {
                return Err(format!(
                    "The value is of type {}, not a string.",
                    actual.type_name()
                ));
            };
            let expected = expected.string_value();
            let ordering = numeric_compare(actual, &expected);
            let satisfied = match operator {
                InfixOperator::Equal => ordering == Ordering::Equal,
                InfixOperator::LessThan => ordering == Ordering::Less,
                InfixOperator::GreaterThan => ordering == Ordering::Greater,
                InfixOperator::LessEq => ordering != Ordering::Greater,
                InfixOperator::GreaterEq => ordering != Ordering::Less,
            };
            if satisfied {
                Ok(())
            } else {
                Err(format!(
                    "{:?} is not {} {:?}.",
                    actual,
                    operator.phrase(),
                    expected
                ))
            }
        }
        MatchExpr::InfixEqualsWildcard { wildcard, .. } => {
            let Some(actual) = value else {
                return Err(NOT_PRESENT.to_string());
            };
            let Some(actual) = actual.as_string() else {
                return Err(format!(
                    "The value is of type {}, not a string.",
                    actual.type_name()
                ));
            };
            let needle = wildcard.string();
            let (satisfied, relation) = match wildcard {
                WildcardString::Prefix { .. } => (actual.ends_with(&needle), "end with"),
                WildcardString::Postfix { .. } => (actual.starts_with(&needle), "begin with"),
                WildcardString::Both { .. } => (actual.contains(&needle), "contain"),
            };
            if satisfied {
                Ok(())
            } else {
                Err(format!("{:?} does not {} {:?}.", actual, relation, needle))
            }
        }
    }
}

/// The `exists` check. A value is present unless it is absent entirely
/// or is exactly the boolean `false`; empty strings and numeric zero
/// still count as present.
pub(crate) fn evaluate_exists(value: Option<&Value>) -> Result<(), String> {
    match value {
        None => Err(NOT_PRESENT.to_string()),
        Some(Value::Bool(false)) => Err("The value is the boolean false.".to_string()),
        Some(_) => Ok(()),
    }
}

/// Numeric-aware string comparison.
///
/// Runs of ASCII digits compare as unsigned integers of arbitrary
/// length; everything else compares bytewise. This is how `"17.4"`
/// sorts above `"7.4"` even though `'1' < '7'`.
pub fn numeric_compare(lhs: &str, rhs: &str) -> Ordering {
    let a = lhs.as_bytes();
    let b = rhs.as_bytes();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let a_start = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let b_start = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let run_a = trim_leading_zeros(&a[a_start..i]);
            let run_b = trim_leading_zeros(&b[b_start..j]);
            let ordering = run_a.len().cmp(&run_b.len()).then_with(|| run_a.cmp(run_b));
            if ordering != Ordering::Equal {
                return ordering;
            }
        } else {
            let ordering = a[i].cmp(&b[j]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i += 1;
            j += 1;
        }
    }
    (a.len() - i).cmp(&(b.len() - j))
}

fn trim_leading_zeros(run: &[u8]) -> &[u8] {
    let first_nonzero = run.iter().position(|&b| b != b'0').unwrap_or(run.len() - 1);
    &run[first_nonzero..]
}
