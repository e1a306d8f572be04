//! Constraint sub-parsers.
//!
//! Each sub-parser looks at the head of the token slice. If the leading
//! keyword is not its own it answers `None` and the next parser gets a
//! turn. Once the keyword is recognized the parser is committed:
//! malformed input past that point is a hard [`ParserError`], not a
//! fallthrough.

use crate::ast::constraints::{
    BracketKey, CertificateConstraint, CodeDirectoryHashConstraint, EntitlementConstraint,
    IdentifierConstraint, InfoConstraint,
};
use crate::ast::match_expr::{InfixOperator, MatchExpr, WildcardString};
use crate::ast::position::CertificatePosition;
use crate::ast::requirement::Requirement;
use crate::parser::error::ParserError;
use crate::tokenizer::{Token, TokenKind};

type Accepted = Option<(Requirement, usize)>;

/// Try each constraint parser in order against the head of `tokens`.
/// Exactly the keyword dispatch order matters here: `identifier`,
/// `info`, `entitlement`, certificate, `cdhash`.
pub(crate) fn parse_constraint(tokens: &[Token]) -> Result<(Requirement, usize), ParserError> {
    if let Some(accepted) = parse_identifier(tokens)? {
        return Ok(accepted);
    }
    if let Some(accepted) = parse_info(tokens)? {
        return Ok(accepted);
    }
    if let Some(accepted) = parse_entitlement(tokens)? {
        return Ok(accepted);
    }
    if let Some(accepted) = parse_certificate(tokens)? {
        return Ok(accepted);
    }
    if let Some(accepted) = parse_cdhash(tokens)? {
        return Ok(accepted);
    }
    Err(ParserError::InvalidToken(format!(
        "no requirement can start with {:?}",
        tokens
            .first()
            .map(|t| t.text.as_str())
            .unwrap_or("end of input")
    )))
}

/// `identifier ["="] string`.
fn parse_identifier(tokens: &[Token]) -> Result<Accepted, ParserError> {
    let Some(keyword) = tokens.first().filter(|t| t.is_keyword("identifier")) else {
        return Ok(None);
    };
    match tokens.get(1) {
        Some(equals) if equals.is(TokenKind::Equals) => {
            let value = tokens
                .get(2)
                .filter(|t| t.is(TokenKind::Identifier))
                .ok_or_else(|| {
                    ParserError::InvalidIdentifier(
                        "identifier = must be followed by a string constant".to_string(),
                    )
                })?;
            let constraint = IdentifierConstraint {
                keyword: keyword.clone(),
                equals: Some(equals.clone()),
                value: value.clone(),
            };
            Ok(Some((Requirement::Identifier(constraint), 3)))
        }
        Some(value) if value.is(TokenKind::Identifier) => {
            let constraint = IdentifierConstraint {
                keyword: keyword.clone(),
                equals: None,
                value: value.clone(),
            };
            Ok(Some((Requirement::Identifier(constraint), 2)))
        }
        _ => Err(ParserError::InvalidIdentifier(
            "identifier must be followed by a string constant".to_string(),
        )),
    }
}

/// `info[key] match`.
fn parse_info(tokens: &[Token]) -> Result<Accepted, ParserError> {
    let Some(keyword) = tokens.first().filter(|t| t.is_keyword("info")) else {
        return Ok(None);
    };
    let (key, key_consumed) = parse_bracket_key(&tokens[1..])?;
    let Some((match_expr, match_consumed)) = parse_match_expr(&tokens[1 + key_consumed..])? else {
        return Err(ParserError::InvalidInfo(
            "info constraint requires a match expression".to_string(),
        ));
    };
    let constraint = InfoConstraint {
        keyword: keyword.clone(),
        key,
        match_expr,
    };
    Ok(Some((
        Requirement::Info(constraint),
        1 + key_consumed + match_consumed,
    )))
}

/// `entitlement[key] match`.
fn parse_entitlement(tokens: &[Token]) -> Result<Accepted, ParserError> {
    let Some(keyword) = tokens.first().filter(|t| t.is_keyword("entitlement")) else {
        return Ok(None);
    };
    let (key, key_consumed) = parse_bracket_key(&tokens[1..])?;
    let Some((match_expr, match_consumed)) = parse_match_expr(&tokens[1 + key_consumed..])? else {
        return Err(ParserError::InvalidInfo(
            "entitlement constraint requires a match expression".to_string(),
        ));
    };
    let constraint = EntitlementConstraint {
        keyword: keyword.clone(),
        key,
        match_expr,
    };
    Ok(Some((
        Requirement::Entitlement(constraint),
        1 + key_consumed + match_consumed,
    )))
}

/// `cdhash H"..."` or `cdhash path`.
fn parse_cdhash(tokens: &[Token]) -> Result<Accepted, ParserError> {
    let Some(keyword) = tokens.first().filter(|t| t.is_keyword("cdhash")) else {
        return Ok(None);
    };
    match tokens.get(1) {
        Some(hash) if hash.is(TokenKind::HashConstant) => {
            let constraint = CodeDirectoryHashConstraint::HashConstant {
                keyword: keyword.clone(),
                hash: hash.clone(),
            };
            Ok(Some((Requirement::CodeDirectoryHash(constraint), 2)))
        }
        Some(path) if path.is(TokenKind::Identifier) => {
            let constraint = CodeDirectoryHashConstraint::FilePath {
                keyword: keyword.clone(),
                path: path.clone(),
            };
            Ok(Some((Requirement::CodeDirectoryHash(constraint), 2)))
        }
        _ => Err(ParserError::InvalidCodeDirectoryHash(
            "cdhash must be followed by a hash constant or a file path".to_string(),
        )),
    }
}

/// Certificate constraints: `anchor ...`, `certificate ...`, `cert ...`.
fn parse_certificate(tokens: &[Token]) -> Result<Accepted, ParserError> {
    let Some(keyword) = tokens.first().filter(|t| {
        t.is_keyword("certificate") || t.is_keyword("cert") || t.is_keyword("anchor")
    }) else {
        return Ok(None);
    };

    let (position, mut consumed) = parse_position(keyword, tokens)?;

    // `anchor apple` and `anchor apple generic` exist only for the
    // literal `anchor` spelling; `certificate root apple` is invalid.
    if matches!(position, CertificatePosition::Anchor { .. }) {
        if let Some(apple) = tokens.get(consumed).filter(|t| t.is_keyword("apple")) {
            if let Some(generic) = tokens.get(consumed + 1).filter(|t| t.is_keyword("generic")) {
                let constraint = CertificateConstraint::WholeAppleGeneric {
                    position,
                    apple: apple.clone(),
                    generic: generic.clone(),
                };
                return Ok(Some((Requirement::Certificate(constraint), consumed + 2)));
            }
            let constraint = CertificateConstraint::WholeApple {
                position,
                apple: apple.clone(),
            };
            return Ok(Some((Requirement::Certificate(constraint), consumed + 1)));
        }
    }

    match tokens.get(consumed) {
        Some(trusted) if trusted.is_keyword("trusted") => {
            let constraint = CertificateConstraint::Trusted {
                position,
                trusted: trusted.clone(),
            };
            Ok(Some((Requirement::Certificate(constraint), consumed + 1)))
        }
        Some(equals) if equals.is(TokenKind::Equals) => {
            let constraint = match tokens.get(consumed + 1) {
                Some(hash) if hash.is(TokenKind::HashConstant) => {
                    CertificateConstraint::WholeHashConstant {
                        position,
                        equals: equals.clone(),
                        hash: hash.clone(),
                    }
                }
                Some(path) if path.is(TokenKind::Identifier) => {
                    CertificateConstraint::WholeHashFilePath {
                        position,
                        equals: equals.clone(),
                        path: path.clone(),
                    }
                }
                _ => {
                    return Err(ParserError::InvalidCertificate(
                        "certificate = must be followed by a hash constant or a file path"
                            .to_string(),
                    ))
                }
            };
            Ok(Some((Requirement::Certificate(constraint), consumed + 2)))
        }
        Some(bracket) if bracket.is(TokenKind::LeftBracket) => {
            let (key, key_consumed) = parse_bracket_key(&tokens[consumed..])?;
            consumed += key_consumed;
            match parse_match_expr(&tokens[consumed..])? {
                Some((match_expr, match_consumed)) => {
                    let constraint = CertificateConstraint::Element {
                        position,
                        key,
                        match_expr,
                    };
                    Ok(Some((
                        Requirement::Certificate(constraint),
                        consumed + match_consumed,
                    )))
                }
                None => {
                    let constraint =
                        CertificateConstraint::ElementImplicitExists { position, key };
                    Ok(Some((Requirement::Certificate(constraint), consumed)))
                }
            }
        }
        _ => Err(ParserError::InvalidCertificate(format!(
            "{} is not a complete requirement on its own",
            position.text_form()
        ))),
    }
}

/// The position part of a certificate constraint.
fn parse_position(
    keyword: &Token,
    tokens: &[Token],
) -> Result<(CertificatePosition, usize), ParserError> {
    if keyword.is_keyword("anchor") {
        return Ok((
            CertificatePosition::Anchor {
                keyword: keyword.clone(),
            },
            1,
        ));
    }
    match tokens.get(1) {
        Some(position) if position.is_keyword("root") => Ok((
            CertificatePosition::Root {
                keyword: keyword.clone(),
                position: position.clone(),
            },
            2,
        )),
        Some(position) if position.is_keyword("leaf") => Ok((
            CertificatePosition::Leaf {
                keyword: keyword.clone(),
                position: position.clone(),
            },
            2,
        )),
        Some(position) if position.unsigned_value().is_some() => {
            let n = position.unsigned_value().unwrap();
            Ok((
                CertificatePosition::PositiveFromLeaf {
                    keyword: keyword.clone(),
                    position: position.clone(),
                    n,
                },
                2,
            ))
        }
        Some(minus) if minus.is(TokenKind::Minus) => {
            let position = tokens
                .get(2)
                .filter(|t| t.unsigned_value().is_some())
                .ok_or_else(|| {
                    ParserError::InvalidCertificate(
                        "certificate - must be followed by an integer position".to_string(),
                    )
                })?;
            let n = position.unsigned_value().unwrap();
            Ok((
                CertificatePosition::NegativeFromAnchor {
                    keyword: keyword.clone(),
                    minus: minus.clone(),
                    position: position.clone(),
                    n,
                },
                3,
            ))
        }
        _ => Err(ParserError::InvalidCertificate(format!(
            "{} must be followed by root, leaf, or an integer position",
            keyword.text
        ))),
    }
}

/// `[key]`.
fn parse_bracket_key(tokens: &[Token]) -> Result<(BracketKey, usize), ParserError> {
    let left = tokens
        .first()
        .filter(|t| t.is(TokenKind::LeftBracket))
        .ok_or_else(|| ParserError::InvalidKeyExpr("expected [ to open a key".to_string()))?;
    let key = tokens
        .get(1)
        .filter(|t| t.is(TokenKind::Identifier))
        .ok_or_else(|| ParserError::InvalidKeyExpr("expected a key inside [ ]".to_string()))?;
    let right = tokens
        .get(2)
        .filter(|t| t.is(TokenKind::RightBracket))
        .ok_or_else(|| ParserError::InvalidKeyExpr("expected ] to close the key".to_string()))?;
    Ok((
        BracketKey {
            left: left.clone(),
            key: key.clone(),
            right: right.clone(),
        },
        3,
    ))
}

/// A match expression, when one starts here.
///
/// `exists` and the comparison operators begin a match expression;
/// anything else answers `None` so the caller can treat the match as
/// absent (which is legal for certificate elements and means an
/// existence check).
pub(crate) fn parse_match_expr(
    tokens: &[Token],
) -> Result<Option<(MatchExpr, usize)>, ParserError> {
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    if first.is_keyword("exists") {
        return Ok(Some((
            MatchExpr::UnarySuffixExists {
                keyword: first.clone(),
            },
            1,
        )));
    }
    let operator = match first.kind {
        TokenKind::Equals => InfixOperator::Equal,
        TokenKind::LessThan => InfixOperator::LessThan,
        TokenKind::GreaterThan => InfixOperator::GreaterThan,
        TokenKind::LessEq => InfixOperator::LessEq,
        TokenKind::GreaterEq => InfixOperator::GreaterEq,
        _ => return Ok(None),
    };

    if operator == InfixOperator::Equal {
        return parse_equals_operand(first, tokens).map(Some);
    }

    // Inequalities take a plain string operand; wildcards are a
    // syntactic error once an inequality operator has been committed.
    match tokens.get(1) {
        Some(star) if star.is(TokenKind::Wildcard) => Err(ParserError::InvalidMatchExpr(
            "wildcard operands are only valid with =".to_string(),
        )),
        Some(value) if value.is(TokenKind::Identifier) => {
            check_match_value(value)?;
            if tokens.get(2).is_some_and(|t| t.is(TokenKind::Wildcard)) {
                return Err(ParserError::InvalidMatchExpr(
                    "wildcard operands are only valid with =".to_string(),
                ));
            }
            Ok(Some((
                MatchExpr::Infix {
                    operator,
                    operator_token: first.clone(),
                    value: value.clone(),
                },
                2,
            )))
        }
        _ => Err(ParserError::InvalidMatchExpr(format!(
            "expected a string constant after {}",
            operator.as_str()
        ))),
    }
}

/// The operand of `=`: a plain string, `s*`, `*s`, or `*s*`.
fn parse_equals_operand(
    equals: &Token,
    tokens: &[Token],
) -> Result<(MatchExpr, usize), ParserError> {
    match tokens.get(1) {
        Some(star) if star.is(TokenKind::Wildcard) => {
            let value = tokens
                .get(2)
                .filter(|t| t.is(TokenKind::Identifier))
                .ok_or_else(|| {
                    ParserError::InvalidMatchExpr(
                        "expected a string constant after = *".to_string(),
                    )
                })?;
            check_match_value(value)?;
            let wildcard = match tokens.get(3) {
                Some(right) if right.is(TokenKind::Wildcard) => WildcardString::Both {
                    left_star: star.clone(),
                    value: value.clone(),
                    right_star: right.clone(),
                },
                _ => WildcardString::Prefix {
                    star: star.clone(),
                    value: value.clone(),
                },
            };
            let consumed = match wildcard {
                WildcardString::Both { .. } => 4,
                _ => 3,
            };
            Ok((
                MatchExpr::InfixEqualsWildcard {
                    operator_token: equals.clone(),
                    wildcard,
                },
                consumed,
            ))
        }
        Some(value) if value.is(TokenKind::Identifier) => {
            check_match_value(value)?;
            if let Some(star) = tokens.get(2).filter(|t| t.is(TokenKind::Wildcard)) {
                return Ok((
                    MatchExpr::InfixEqualsWildcard {
                        operator_token: equals.clone(),
                        wildcard: WildcardString::Postfix {
                            value: value.clone(),
                            star: star.clone(),
                        },
                    },
                    3,
                ));
            }
            Ok((
                MatchExpr::Infix {
                    operator: InfixOperator::Equal,
                    operator_token: equals.clone(),
                    value: value.clone(),
                },
                2,
            ))
        }
        _ => Err(ParserError::InvalidMatchExpr(
            "expected a string constant or wildcard after =".to_string(),
        )),
    }
}

/// Unquoted match values may not begin with a digit; the platform
/// compiler rejects them, so version-like values must be quoted.
fn check_match_value(value: &Token) -> Result<(), ParserError> {
    if !value.text.starts_with('"')
        && value.text.chars().next().is_some_and(|c| c.is_ascii_digit())
    {
        return Err(ParserError::InvalidMatchExpr(format!(
            "unquoted value {} begins with a digit and must be quoted",
            value.text
        )));
    }
    Ok(())
}
