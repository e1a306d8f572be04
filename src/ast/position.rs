//! Certificate chain positions.

use serde::Serialize;

use crate::tokenizer::{SourceRange, Token};

/// Where in the certificate chain a certificate constraint points.
///
/// The chain is ordered leaf first: index 0 is the leaf, the last entry
/// is the root. `Anchor` and `Root` resolve to the same chain slot but
/// are distinct positions grammatically: only the literal `anchor`
/// spelling participates in `anchor apple` and `anchor apple generic`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CertificatePosition {
    /// `certificate root` or `cert root`.
    Root { keyword: Token, position: Token },
    /// `certificate leaf` or `cert leaf`.
    Leaf { keyword: Token, position: Token },
    /// `certificate n`: n certificates up from the leaf.
    PositiveFromLeaf {
        keyword: Token,
        position: Token,
        n: u32,
    },
    /// `certificate -n`: n certificates down from the anchor.
    NegativeFromAnchor {
        keyword: Token,
        minus: Token,
        position: Token,
        n: u32,
    },
    /// The bare `anchor` keyword.
    Anchor { keyword: Token },
}

impl CertificatePosition {
    pub fn source_range(&self) -> SourceRange {
        match self {
            CertificatePosition::Root { keyword, position }
            | CertificatePosition::Leaf { keyword, position }
            | CertificatePosition::PositiveFromLeaf {
                keyword, position, ..
            } => keyword.range.join(position.range),
            CertificatePosition::NegativeFromAnchor {
                keyword, position, ..
            } => keyword.range.join(position.range),
            CertificatePosition::Anchor { keyword } => keyword.range,
        }
    }

    /// Canonical spelling, preserving the author's `cert` vs
    /// `certificate` choice through the stored keyword token.
    pub fn text_form(&self) -> String {
        match self {
            CertificatePosition::Root { keyword, .. } => format!("{} root", keyword.text),
            CertificatePosition::Leaf { keyword, .. } => format!("{} leaf", keyword.text),
            CertificatePosition::PositiveFromLeaf {
                keyword, position, ..
            } => format!("{} {}", keyword.text, position.text),
            CertificatePosition::NegativeFromAnchor {
                keyword, position, ..
            } => format!("{} -{}", keyword.text, position.text),
            CertificatePosition::Anchor { .. } => "anchor".to_string(),
        }
    }

    /// Resolve to an index into a leaf-first chain of `chain_len`
    /// certificates. `None` means the position falls outside the chain.
    pub fn chain_index(&self, chain_len: usize) -> Option<usize> {
        if chain_len == 0 {
            return None;
        }
        match self {
            CertificatePosition::Leaf { .. } => Some(0),
            CertificatePosition::Root { .. } | CertificatePosition::Anchor { .. } => {
                Some(chain_len - 1)
            }
            CertificatePosition::PositiveFromLeaf { n, .. } => {
                let index = *n as usize;
                (index < chain_len).then_some(index)
            }
            CertificatePosition::NegativeFromAnchor { n, .. } => {
                let offset = *n as usize;
                (offset >= 1 && offset <= chain_len).then(|| chain_len - offset)
            }
        }
    }
}
