//! Requirement and requirement-set parsing.
//!
//! The grammar has prefix (`!`), infix (`and`, `or`), and grouping
//! (`(...)`) operators around constraint leaves. Rather than classic
//! precedence climbing, parsing runs in two phases: linearize the token
//! stream into a flat list of parsed constraints and operator symbols,
//! then fold that list by precedence. The flat list makes the operator
//! handling easy to reason about and keeps constraint parsing (where
//! all the keyword ambiguity lives) in one place.

use std::collections::BTreeMap;

use crate::ast::requirement::{
    AndRequirement, NegationRequirement, OrRequirement, ParenthesesRequirement, Requirement,
};
use crate::ast::requirement_set::{ParseResult, RequirementSet, RequirementTag};
use crate::parser::constraints::parse_constraint;
use crate::parser::error::ParserError;
use crate::tokenizer::{Token, TokenKind};

/// Parse a full token stream (whitespace and comments included) into a
/// single requirement or a requirement set.
///
/// The stream is a requirement set when it begins with one of the four
/// tag keywords and contains at least one `=>` marker; otherwise it is
/// parsed as a single requirement.
pub fn parse_tokens(tokens: &[Token]) -> Result<ParseResult, ParserError> {
    let filtered = filter_tokens(tokens);
    let leads_with_tag = filtered
        .first()
        .and_then(|t| RequirementTag::from_keyword(&t.text))
        .is_some();
    let has_marker = filtered
        .iter()
        .any(|t| t.is(TokenKind::RequirementSetMarker));
    if leads_with_tag && has_marker {
        parse_requirement_set(&filtered).map(ParseResult::RequirementSet)
    } else {
        parse_requirement_slice(&filtered).map(ParseResult::Requirement)
    }
}

/// Parse a token stream as a single requirement, never a set.
pub fn parse_requirement_tokens(tokens: &[Token]) -> Result<Requirement, ParserError> {
    parse_requirement_slice(&filter_tokens(tokens))
}

/// The parser's working view: everything except whitespace and comments.
fn filter_tokens(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Comment))
        .cloned()
        .collect()
}

/// Parse `tag => requirement` runs. Every `=>` must be immediately
/// preceded by a tag keyword; the body of each tag runs up to the tag
/// of the next marker or the end of input.
fn parse_requirement_set(tokens: &[Token]) -> Result<RequirementSet, ParserError> {
    let marker_indices: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is(TokenKind::RequirementSetMarker))
        .map(|(index, _)| index)
        .collect();

    let mut tags = Vec::with_capacity(marker_indices.len());
    for &marker in &marker_indices {
        let tag = marker
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .and_then(|t| RequirementTag::from_keyword(&t.text))
            .ok_or_else(|| {
                ParserError::InvalidRequirementSet(
                    "=> must be immediately preceded by host, guest, library, or designated"
                        .to_string(),
                )
            })?;
        tags.push(tag);
    }
    if marker_indices[0] != 1 {
        return Err(ParserError::InvalidRequirementSet(
            "a requirement set must begin with a tag".to_string(),
        ));
    }

    let mut requirements = BTreeMap::new();
    for (position, (&marker, &tag)) in marker_indices.iter().zip(&tags).enumerate() {
        let body_end = marker_indices
            .get(position + 1)
            .map(|&next| next - 1)
            .unwrap_or(tokens.len());
        let body = &tokens[marker + 1..body_end];
        let requirement = parse_requirement_slice(body)?;
        if requirements.insert(tag, requirement).is_some() {
            return Err(ParserError::InvalidRequirementSet(format!(
                "duplicate tag {}",
                tag
            )));
        }
    }
    Ok(RequirementSet { requirements })
}

/// Parse an already-filtered token slice into one requirement.
pub(crate) fn parse_requirement_slice(tokens: &[Token]) -> Result<Requirement, ParserError> {
    let (entries, consumed) = linearize(tokens, 0)?;
    debug_assert_eq!(consumed, tokens.len());
    fold(entries)
}

/// One element of the linearized view of a requirement.
enum Entry {
    Requirement(Requirement),
    Negation(Token),
    And(Token),
    Or(Token),
}

/// Phase 1: scan left to right, producing parsed requirements and
/// operator symbols. Parentheses recurse; the matching `)` is consumed
/// by the recursion. Returns the entries and the number of tokens
/// consumed from the slice.
fn linearize(tokens: &[Token], depth: usize) -> Result<(Vec<Entry>, usize), ParserError> {
    let mut entries = Vec::new();
    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        match token.kind {
            TokenKind::LeftParen => {
                let left = token.clone();
                let (inner, inner_consumed) = linearize(&tokens[index + 1..], depth + 1)?;
                let right = tokens[index + inner_consumed].clone();
                let child = fold(inner)?;
                entries.push(Entry::Requirement(Requirement::Parentheses(
                    ParenthesesRequirement {
                        left,
                        child: Box::new(child),
                        right,
                    },
                )));
                index += 1 + inner_consumed;
            }
            TokenKind::RightParen => {
                if depth == 0 {
                    return Err(ParserError::InvalidToken(
                        "unexpected ) with no matching (".to_string(),
                    ));
                }
                return Ok((entries, index + 1));
            }
            TokenKind::Negation => {
                entries.push(Entry::Negation(token.clone()));
                index += 1;
            }
            TokenKind::Identifier if token.text == "and" => {
                entries.push(Entry::And(token.clone()));
                index += 1;
            }
            TokenKind::Identifier if token.text == "or" => {
                entries.push(Entry::Or(token.clone()));
                index += 1;
            }
            _ => {
                let (requirement, consumed) = parse_constraint(&tokens[index..])?;
                entries.push(Entry::Requirement(requirement));
                index += consumed;
            }
        }
    }
    if depth > 0 {
        return Err(ParserError::InvalidToken(
            "missing ) before end of input".to_string(),
        ));
    }
    Ok((entries, tokens.len()))
}

/// Phase 2: fold the flat list by precedence. `!` binds tightest and is
/// resolved right to left, which handles `!!x` in a single sweep; `and`
/// then `or` are folded left to right, making both left-associative.
fn fold(mut entries: Vec<Entry>) -> Result<Requirement, ParserError> {
    if entries.is_empty() {
        return Err(ParserError::Invalid("empty requirement".to_string()));
    }

    let mut index = entries.len();
    while index > 0 {
        index -= 1;
        if !matches!(entries[index], Entry::Negation(_)) {
            continue;
        }
        let Entry::Negation(negation) = entries.remove(index) else {
            unreachable!()
        };
        if index >= entries.len() {
            return Err(ParserError::InvalidNegation(
                "! must be followed by a requirement".to_string(),
            ));
        }
        let Entry::Requirement(child) = entries.remove(index) else {
            return Err(ParserError::InvalidNegation(
                "! must be followed by a requirement".to_string(),
            ));
        };
        entries.insert(
            index,
            Entry::Requirement(Requirement::Negation(NegationRequirement {
                negation,
                child: Box::new(child),
            })),
        );
    }

    fold_infix(&mut entries, true)?;
    fold_infix(&mut entries, false)?;

    if entries.len() != 1 {
        return Err(ParserError::Invalid(format!(
            "expected a single requirement, found {} adjacent parts",
            entries.len()
        )));
    }
    match entries.pop() {
        Some(Entry::Requirement(requirement)) => Ok(requirement),
        _ => Err(ParserError::Invalid(
            "expected a single requirement".to_string(),
        )),
    }
}

fn fold_infix(entries: &mut Vec<Entry>, fold_and: bool) -> Result<(), ParserError> {
    let mut index = 0;
    while index < entries.len() {
        let is_target = match &entries[index] {
            Entry::And(_) => fold_and,
            Entry::Or(_) => !fold_and,
            _ => false,
        };
        if !is_target {
            index += 1;
            continue;
        }
        let has_lhs = index >= 1 && matches!(entries[index - 1], Entry::Requirement(_));
        let has_rhs =
            index + 1 < entries.len() && matches!(entries[index + 1], Entry::Requirement(_));
        if !has_lhs || !has_rhs {
            return Err(if fold_and {
                ParserError::InvalidAnd("and must connect two requirements".to_string())
            } else {
                ParserError::InvalidOr("or must connect two requirements".to_string())
            });
        }
        let Entry::Requirement(rhs) = entries.remove(index + 1) else {
            unreachable!()
        };
        let keyword = match entries.remove(index) {
            Entry::And(token) | Entry::Or(token) => token,
            _ => unreachable!(),
        };
        let Entry::Requirement(lhs) = entries.remove(index - 1) else {
            unreachable!()
        };
        let combined = if fold_and {
            Requirement::And(AndRequirement {
                lhs: Box::new(lhs),
                keyword,
                rhs: Box::new(rhs),
            })
        } else {
            Requirement::Or(OrRequirement {
                lhs: Box::new(lhs),
                keyword,
                rhs: Box::new(rhs),
            })
        };
        entries.insert(index - 1, Entry::Requirement(combined));
        // The combined node sits where the lhs was; the slot at `index`
        // may now hold the next operator of the same precedence, so the
        // cursor stays put.
    }
    Ok(())
}
