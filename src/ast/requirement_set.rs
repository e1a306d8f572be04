//! Tagged requirement collections and the top-level parse result.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::requirement::Requirement;

/// The four requirement slots a requirement set can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RequirementTag {
    Host,
    Guest,
    Library,
    Designated,
}

impl RequirementTag {
    /// Look up a tag by its keyword spelling.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "host" => Some(RequirementTag::Host),
            "guest" => Some(RequirementTag::Guest),
            "library" => Some(RequirementTag::Library),
            "designated" => Some(RequirementTag::Designated),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            RequirementTag::Host => "host",
            RequirementTag::Guest => "guest",
            RequirementTag::Library => "library",
            RequirementTag::Designated => "designated",
        }
    }
}

impl std::fmt::Display for RequirementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A mapping from tag to requirement, written `tag => requirement ...`.
/// Tags are unique; the parser rejects duplicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RequirementSet {
    pub requirements: BTreeMap<RequirementTag, Requirement>,
}

impl RequirementSet {
    pub fn get(&self, tag: RequirementTag) -> Option<&Requirement> {
        self.requirements.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Canonical text: one `tag => requirement` line per entry. The
    /// entry order is the tag order; any order reparses into an equal
    /// set.
    pub fn text_form(&self) -> String {
        self.requirements
            .iter()
            .map(|(tag, requirement)| format!("{} => {}", tag, requirement.text_form()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What a requirement string parses into: either one requirement or a
/// tagged set of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParseResult {
    Requirement(Requirement),
    RequirementSet(RequirementSet),
}

impl ParseResult {
    pub fn text_form(&self) -> String {
        match self {
            ParseResult::Requirement(requirement) => requirement.text_form(),
            ParseResult::RequirementSet(set) => set.text_form(),
        }
    }

    /// The single requirement, when this is not a set.
    pub fn requirement(&self) -> Option<&Requirement> {
        match self {
            ParseResult::Requirement(requirement) => Some(requirement),
            ParseResult::RequirementSet(_) => None,
        }
    }

    pub fn requirement_set(&self) -> Option<&RequirementSet> {
        match self {
            ParseResult::Requirement(_) => None,
            ParseResult::RequirementSet(set) => Some(set),
        }
    }
}
