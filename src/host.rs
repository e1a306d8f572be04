//! In-memory implementations of the host interfaces.
//!
//! [`StaticSubject`] and [`StaticCertificate`] hold their data as plain
//! owned values. They exist for tests and for embedders that obtain
//! signing information through some channel other than a platform
//! code-signing API; production hosts implement
//! [`Subject`](crate::evaluator::Subject) against the real thing.

use std::collections::{BTreeMap, BTreeSet};

use crate::evaluator::subject::{Certificate, Subject, ValidityCheck, Value};

/// A certificate described by literal field values.
#[derive(Debug, Clone, Default)]
pub struct StaticCertificate {
    pub der: Vec<u8>,
    pub common_name: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub street_address: Option<String>,
    pub oids: BTreeSet<String>,
}

impl StaticCertificate {
    pub fn new(der: impl Into<Vec<u8>>) -> Self {
        Self {
            der: der.into(),
            ..Self::default()
        }
    }

    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        self.common_name = Some(name.into());
        self
    }

    pub fn with_organizational_unit(mut self, unit: impl Into<String>) -> Self {
        self.organizational_unit = Some(unit.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_oid(mut self, oid: impl Into<String>) -> Self {
        self.oids.insert(oid.into());
        self
    }
}

impl Certificate for StaticCertificate {
    fn raw_der(&self) -> &[u8] {
        &self.der
    }

    fn common_name(&self) -> Option<String> {
        self.common_name.clone()
    }

    fn country(&self) -> Option<String> {
        self.country.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn locality(&self) -> Option<String> {
        self.locality.clone()
    }

    fn organization(&self) -> Option<String> {
        self.organization.clone()
    }

    fn organizational_unit(&self) -> Option<String> {
        self.organizational_unit.clone()
    }

    fn street_address(&self) -> Option<String> {
        self.street_address.clone()
    }

    fn has_oid(&self, oid: &str) -> bool {
        self.oids.contains(oid)
    }
}

/// A subject described by literal values.
///
/// `check_validity` answers from the `valid_requirements` allow list:
/// listed requirement texts check out, everything else fails. Host
/// errors can be simulated through `validity_error`.
#[derive(Debug, Clone, Default)]
pub struct StaticSubject {
    pub identifier: Option<String>,
    pub info: Option<BTreeMap<String, Value>>,
    pub entitlements: Option<BTreeMap<String, Value>>,
    pub code_directory_hash: Option<Vec<u8>>,
    pub certificates: Option<Vec<StaticCertificate>>,
    pub valid_requirements: BTreeSet<String>,
    pub validity_error: Option<String>,
}

impl StaticSubject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_info_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_entitlement(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entitlements
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_code_directory_hash(mut self, hash: impl Into<Vec<u8>>) -> Self {
        self.code_directory_hash = Some(hash.into());
        self
    }

    pub fn with_certificates(mut self, chain: Vec<StaticCertificate>) -> Self {
        self.certificates = Some(chain);
        self
    }

    /// Mark a requirement text as accepted by the host check.
    pub fn with_valid_requirement(mut self, requirement_text: impl Into<String>) -> Self {
        self.valid_requirements.insert(requirement_text.into());
        self
    }

    pub fn with_validity_error(mut self, message: impl Into<String>) -> Self {
        self.validity_error = Some(message.into());
        self
    }
}

impl Subject for StaticSubject {
    fn identifier(&self) -> Option<String> {
        self.identifier.clone()
    }

    fn info_dict(&self) -> Option<BTreeMap<String, Value>> {
        self.info.clone()
    }

    fn entitlements(&self) -> Option<BTreeMap<String, Value>> {
        self.entitlements.clone()
    }

    fn code_directory_hash(&self) -> Option<Vec<u8>> {
        self.code_directory_hash.clone()
    }

    fn certificate_chain(&self) -> Option<Vec<&dyn Certificate>> {
        self.certificates
            .as_ref()
            .map(|chain| chain.iter().map(|c| c as &dyn Certificate).collect())
    }

    fn check_validity(&self, requirement_text: &str) -> ValidityCheck {
        if let Some(message) = &self.validity_error {
            return ValidityCheck::Error(message.clone());
        }
        if self.valid_requirements.contains(requirement_text) {
            ValidityCheck::Ok
        } else {
            ValidityCheck::RequirementFailed
        }
    }
}
