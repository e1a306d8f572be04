//! The tree-walking evaluation itself.

use std::collections::BTreeMap;
use std::fs;

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::ast::constraints::{
    BracketKey, CertificateConstraint, CodeDirectoryHashConstraint, IdentifierConstraint,
};
use crate::ast::match_expr::MatchExpr;
use crate::ast::position::CertificatePosition;
use crate::ast::requirement::Requirement;
use crate::evaluator::apple_roots::is_accepted_apple_root;
use crate::evaluator::evaluation::Evaluation;
use crate::evaluator::match_eval::{evaluate_exists, evaluate_match};
use crate::evaluator::subject::{Certificate, Subject, ValidityCheck, Value};

/// Host-environment failure. Everything else the evaluator can run
/// into becomes an unsatisfied leaf with an explanation, never an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    Host(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Host(message) => write!(f, "host failure: {}", message),
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluate a requirement against a subject, producing an evaluation
/// tree of the same shape.
pub fn evaluate<'r>(
    requirement: &'r Requirement,
    subject: &dyn Subject,
) -> Result<Evaluation<'r>, EvalError> {
    match requirement {
        Requirement::And(node) => {
            let lhs = evaluate(&node.lhs, subject)?;
            let rhs = evaluate(&node.rhs, subject)?;
            let satisfied = lhs.is_satisfied() && rhs.is_satisfied();
            Ok(Evaluation::compound(requirement, satisfied, vec![lhs, rhs]))
        }
        Requirement::Or(node) => {
            let lhs = evaluate(&node.lhs, subject)?;
            let rhs = evaluate(&node.rhs, subject)?;
            let satisfied = lhs.is_satisfied() || rhs.is_satisfied();
            Ok(Evaluation::compound(requirement, satisfied, vec![lhs, rhs]))
        }
        Requirement::Negation(node) => {
            let child = evaluate(&node.child, subject)?;
            let satisfied = !child.is_satisfied();
            Ok(Evaluation::compound(requirement, satisfied, vec![child]))
        }
        Requirement::Parentheses(node) => {
            let child = evaluate(&node.child, subject)?;
            let satisfied = child.is_satisfied();
            Ok(Evaluation::compound(requirement, satisfied, vec![child]))
        }
        Requirement::Identifier(constraint) => Ok(Evaluation::leaf(
            requirement,
            eval_identifier(constraint, subject),
        )),
        Requirement::Info(constraint) => Ok(Evaluation::leaf(
            requirement,
            eval_dictionary(
                subject.info_dict(),
                "Info dictionary",
                &constraint.key,
                &constraint.match_expr,
            ),
        )),
        Requirement::Entitlement(constraint) => Ok(Evaluation::leaf(
            requirement,
            eval_dictionary(
                subject.entitlements(),
                "entitlements",
                &constraint.key,
                &constraint.match_expr,
            ),
        )),
        Requirement::CodeDirectoryHash(constraint) => Ok(Evaluation::leaf(
            requirement,
            eval_cdhash(constraint, subject),
        )),
        Requirement::Certificate(constraint) => {
            let outcome = eval_certificate(constraint, subject)?;
            Ok(Evaluation::leaf(requirement, outcome))
        }
    }
}

fn eval_identifier(constraint: &IdentifierConstraint, subject: &dyn Subject) -> Result<(), String> {
    let expected = constraint.constant();
    match subject.identifier() {
        None => Err("The subject has no identifier.".to_string()),
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(format!(
            "Identifier {:?} does not match {:?}.",
            actual, expected
        )),
    }
}

fn eval_dictionary(
    dictionary: Option<BTreeMap<String, Value>>,
    what: &str,
    key: &BracketKey,
    match_expr: &MatchExpr,
) -> Result<(), String> {
    let Some(dictionary) = dictionary else {
        return Err(format!("The subject has no {}.", what));
    };
    evaluate_match(match_expr, dictionary.get(&key.value()))
}

fn eval_cdhash(
    constraint: &CodeDirectoryHashConstraint,
    subject: &dyn Subject,
) -> Result<(), String> {
    let Some(actual) = subject.code_directory_hash() else {
        return Err("The subject has no code directory hash.".to_string());
    };
    match constraint {
        CodeDirectoryHashConstraint::HashConstant { hash, .. } => {
            let actual = hex_string(&actual);
            let expected = hash.hash_value().unwrap_or_default();
            if actual == expected {
                Ok(())
            } else {
                Err(format!(
                    "Code directory hash {} does not match {}.",
                    actual, expected
                ))
            }
        }
        CodeDirectoryHashConstraint::FilePath { path, .. } => {
            let path = path.string_value();
            let contents = fs::read(&path)
                .map_err(|error| format!("Could not read {}: {}.", path, error))?;
            if Sha1::digest(&contents).as_slice() == actual.as_slice() {
                Ok(())
            } else {
                Err(format!(
                    "The SHA-1 of {} does not match the code directory hash.",
                    path
                ))
            }
        }
    }
}

fn eval_certificate(
    constraint: &CertificateConstraint,
    subject: &dyn Subject,
) -> Result<Result<(), String>, EvalError> {
    match constraint {
        // Whether a chain anchors to Apple proper, and whether the
        // system trusts a certificate, live in platform trust stores
        // the evaluator cannot see. The host answers both.
        CertificateConstraint::WholeApple { .. } => host_check(
            subject,
            constraint,
            "The signing chain does not anchor to an Apple certificate.",
        ),
        CertificateConstraint::Trusted { .. } => host_check(
            subject,
            constraint,
            "The system does not trust the certificate.",
        ),
        CertificateConstraint::WholeAppleGeneric { .. } => Ok(eval_apple_generic(subject)),
        CertificateConstraint::WholeHashConstant { position, hash, .. } => {
            Ok(eval_whole_hash(subject, position, hash.hash_value().unwrap_or_default()))
        }
        CertificateConstraint::WholeHashFilePath { position, path, .. } => {
            Ok(eval_whole_hash_file(subject, position, &path.string_value()))
        }
        CertificateConstraint::Element {
            position,
            key,
            match_expr,
        } => Ok(eval_element(subject, position, key, Some(match_expr))),
        CertificateConstraint::ElementImplicitExists { position, key } => {
            Ok(eval_element(subject, position, key, None))
        }
    }
}

fn host_check(
    subject: &dyn Subject,
    constraint: &CertificateConstraint,
    failure: &str,
) -> Result<Result<(), String>, EvalError> {
    match subject.check_validity(&constraint.text_form()) {
        ValidityCheck::Ok => Ok(Ok(())),
        ValidityCheck::RequirementFailed => Ok(Err(failure.to_string())),
        ValidityCheck::Error(message) => Err(EvalError::Host(message)),
    }
}

fn eval_apple_generic(subject: &dyn Subject) -> Result<(), String> {
    let Some(chain) = subject.certificate_chain() else {
        return Err("The subject has no certificate chain.".to_string());
    };
    let Some(root) = chain.last() else {
        return Err("The certificate chain is empty.".to_string());
    };
    let digest = hex_string(&Sha256::digest(root.raw_der()));
    if is_accepted_apple_root(&digest) {
        Ok(())
    } else {
        Err("The root certificate is not an accepted Apple root.".to_string())
    }
}

fn eval_whole_hash(
    subject: &dyn Subject,
    position: &CertificatePosition,
    expected: String,
) -> Result<(), String> {
    let Some(chain) = subject.certificate_chain() else {
        return Err("The subject has no certificate chain.".to_string());
    };
    let certificate = positioned_certificate(&chain, position)?;
    let actual = hex_string(&Sha1::digest(certificate.raw_der()));
    if actual == expected {
        Ok(())
    } else {
        Err(format!(
            "The certificate at {} has SHA-1 {}, expected {}.",
            position.text_form(),
            actual,
            expected
        ))
    }
}

fn eval_whole_hash_file(
    subject: &dyn Subject,
    position: &CertificatePosition,
    path: &str,
) -> Result<(), String> {
    let Some(chain) = subject.certificate_chain() else {
        return Err("The subject has no certificate chain.".to_string());
    };
    let certificate = positioned_certificate(&chain, position)?;
    let contents =
        fs::read(path).map_err(|error| format!("Could not read {}: {}.", path, error))?;
    if Sha1::digest(&contents) == Sha1::digest(certificate.raw_der()) {
        Ok(())
    } else {
        Err(format!(
            "The certificate at {} does not match the certificate in {}.",
            position.text_form(),
            path
        ))
    }
}

fn eval_element(
    subject: &dyn Subject,
    position: &CertificatePosition,
    key: &BracketKey,
    match_expr: Option<&MatchExpr>,
) -> Result<(), String> {
    let Some(chain) = subject.certificate_chain() else {
        return Err("The subject has no certificate chain.".to_string());
    };
    let certificate = positioned_certificate(&chain, position)?;
    let key_string = key.value();

    if let Some(oid) = key_string.strip_prefix("field.") {
        let exists_only = matches!(
            match_expr,
            None | Some(MatchExpr::UnarySuffixExists { .. })
        );
        if !exists_only {
            return Err("Only an existence check is supported for OID fields.".to_string());
        }
        return if certificate.has_oid(oid) {
            Ok(())
        } else {
            Err(format!("The certificate has no field with OID {}.", oid))
        };
    }

    let field = subject_field(certificate, &key_string)?;
    let value = field.map(Value::String);
    match match_expr {
        Some(expr) => evaluate_match(expr, value.as_ref()),
        None => evaluate_exists(value.as_ref()),
    }
}

/// The documented subject field accessors. Any other key is
/// unsupported and reads as an unsatisfied explanation.
fn subject_field(certificate: &dyn Certificate, key: &str) -> Result<Option<String>, String> {
    match key {
        "subject.CN" => Ok(certificate.common_name()),
        "subject.C" => Ok(certificate.country()),
        "subject.D" => Ok(certificate.description()),
        "subject.L" => Ok(certificate.locality()),
        "subject.O" => Ok(certificate.organization()),
        "subject.OU" => Ok(certificate.organizational_unit()),
        "subject.STREET" => Ok(certificate.street_address()),
        _ => Err(format!("Element key {} is not supported.", key)),
    }
}

/// Resolve a position within a leaf-first chain.
fn positioned_certificate<'c>(
    chain: &[&'c dyn Certificate],
    position: &CertificatePosition,
) -> Result<&'c dyn Certificate, String> {
    position
        .chain_index(chain.len())
        .and_then(|index| chain.get(index).copied())
        .ok_or_else(|| {
            format!(
                "The certificate chain has no certificate at position {}.",
                position.text_form()
            )
        })
}

/// Lower-case hex of a byte string.
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
