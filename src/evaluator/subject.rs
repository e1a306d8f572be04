//! The host interface: what the evaluator needs to know about a signed
//! artifact. Implementations live with the host (or in
//! [`crate::host`] for the in-memory variant); the evaluator only sees
//! these traits.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A dynamically typed Info-dictionary or entitlement value.
///
/// Only strings participate in comparisons; booleans get special
/// treatment in existence checks; everything else is "present but not
/// comparable".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Data(Vec<u8>),
    Array(Vec<Value>),
    Dictionary(BTreeMap<String, Value>),
}

impl Value {
    /// Type name used in explanations.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Date(_) => "date",
            Value::Data(_) => "data",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

/// Outcome of the host's opaque full-requirement check, used for
/// `anchor apple` and `... trusted`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidityCheck {
    /// The host accepts the requirement.
    Ok,
    /// The host evaluated the requirement and it does not hold.
    RequirementFailed,
    /// The host itself failed; surfaces as an evaluation error.
    Error(String),
}

/// One certificate in the subject's signing chain.
pub trait Certificate {
    /// The DER encoding, hashed for whole-certificate constraints.
    fn raw_der(&self) -> &[u8];

    fn common_name(&self) -> Option<String>;
    fn country(&self) -> Option<String>;
    fn description(&self) -> Option<String>;
    fn locality(&self) -> Option<String>;
    fn organization(&self) -> Option<String>;
    fn organizational_unit(&self) -> Option<String>;
    fn street_address(&self) -> Option<String>;

    /// Whether the certificate carries an extension with this OID.
    fn has_oid(&self, oid: &str) -> bool;
}

/// The evaluator's view of a signed artifact.
pub trait Subject {
    /// The signing identifier, if the artifact has one.
    fn identifier(&self) -> Option<String>;

    /// The Info dictionary, if present.
    fn info_dict(&self) -> Option<BTreeMap<String, Value>>;

    /// The entitlements dictionary, if present.
    fn entitlements(&self) -> Option<BTreeMap<String, Value>>;

    /// The canonical code directory hash.
    fn code_directory_hash(&self) -> Option<Vec<u8>>;

    /// The signing chain, leaf first, anchor last.
    fn certificate_chain(&self) -> Option<Vec<&dyn Certificate>>;

    /// Ask the host whether this subject satisfies `requirement_text`
    /// in full. Used only for requirements that depend on platform
    /// trust databases.
    fn check_validity(&self, requirement_text: &str) -> ValidityCheck;
}
