#[cfg(test)]
mod parser_tests {
    use crate::ast::{
        CertificateConstraint, CertificatePosition, InfixOperator, MatchExpr, ParseResult,
        Requirement, WildcardString,
    };
    use crate::parser::error::ParserError;
    use crate::parser::parse_tokens;
    use crate::tokenizer::tokenize;

    fn parse(source: &str) -> Result<ParseResult, ParserError> {
        parse_tokens(&tokenize(source).unwrap())
    }

    fn parse_requirement(source: &str) -> Requirement {
        match parse(source).unwrap() {
            ParseResult::Requirement(requirement) => requirement,
            ParseResult::RequirementSet(_) => panic!("expected a single requirement"),
        }
    }

    #[test]
    fn test_identifier_implicit_equality() {
        let requirement = parse_requirement(r#"identifier "com.apple.Safari""#);
        let Requirement::Identifier(constraint) = requirement else {
            panic!("expected identifier constraint");
        };
        assert_eq!(constraint.constant(), "com.apple.Safari");
        assert!(constraint.equals.is_none());
    }

    #[test]
    fn test_identifier_explicit_equality() {
        let requirement = parse_requirement(r#"identifier = "com.apple.Safari""#);
        let Requirement::Identifier(constraint) = requirement else {
            panic!("expected identifier constraint");
        };
        assert_eq!(constraint.constant(), "com.apple.Safari");
        assert!(constraint.equals.is_some());
    }

    #[test]
    fn test_identifier_unquoted() {
        let requirement = parse_requirement("identifier com.apple.perl");
        let Requirement::Identifier(constraint) = requirement else {
            panic!("expected identifier constraint");
        };
        assert_eq!(constraint.constant(), "com.apple.perl");
    }

    #[test]
    fn test_identifier_missing_operand() {
        assert!(matches!(
            parse("identifier"),
            Err(ParserError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_precedence_and_binds_tighter_than_or() {
        let requirement = parse_requirement(
            r#"identifier "a" or identifier "b" and identifier "c""#,
        );
        let Requirement::Or(or) = requirement else {
            panic!("expected or at the top");
        };
        assert!(matches!(*or.rhs, Requirement::And(_)));
    }

    #[test]
    fn test_infix_operators_are_left_associative() {
        let requirement =
            parse_requirement(r#"identifier "a" and identifier "b" and identifier "c""#);
        let Requirement::And(outer) = requirement else {
            panic!("expected and at the top");
        };
        assert!(matches!(*outer.lhs, Requirement::And(_)));
        assert!(matches!(*outer.rhs, Requirement::Identifier(_)));
    }

    #[test]
    fn test_double_negation() {
        let requirement = parse_requirement(r#"!!identifier "x""#);
        let Requirement::Negation(outer) = requirement else {
            panic!("expected negation");
        };
        let Requirement::Negation(inner) = *outer.child else {
            panic!("expected inner negation");
        };
        assert!(matches!(*inner.child, Requirement::Identifier(_)));
    }

    #[test]
    fn test_negation_binds_tighter_than_and() {
        let requirement = parse_requirement(r#"!identifier "a" and anchor apple"#);
        let Requirement::And(and) = requirement else {
            panic!("expected and at the top");
        };
        assert!(matches!(*and.lhs, Requirement::Negation(_)));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let requirement =
            parse_requirement(r#"identifier "a" and (identifier "b" or identifier "c")"#);
        let Requirement::And(and) = requirement else {
            panic!("expected and at the top");
        };
        let Requirement::Parentheses(parens) = &*and.rhs else {
            panic!("expected parentheses on the right");
        };
        assert!(matches!(*parens.child, Requirement::Or(_)));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(matches!(
            parse(r#"(identifier "a""#),
            Err(ParserError::InvalidToken(_))
        ));
        assert!(matches!(
            parse(r#"identifier "a")"#),
            Err(ParserError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_anchor_apple_and_generic() {
        assert!(matches!(
            parse_requirement("anchor apple"),
            Requirement::Certificate(CertificateConstraint::WholeApple { .. })
        ));
        assert!(matches!(
            parse_requirement("anchor apple generic"),
            Requirement::Certificate(CertificateConstraint::WholeAppleGeneric { .. })
        ));
    }

    #[test]
    fn test_certificate_root_apple_is_invalid() {
        assert!(matches!(
            parse("certificate root apple"),
            Err(ParserError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn test_anchor_alone_is_not_a_requirement() {
        assert!(matches!(
            parse("anchor"),
            Err(ParserError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn test_anchor_trusted() {
        let requirement = parse_requirement("anchor trusted");
        let Requirement::Certificate(CertificateConstraint::Trusted { position, .. }) =
            requirement
        else {
            panic!("expected trusted constraint");
        };
        assert!(matches!(position, CertificatePosition::Anchor { .. }));
    }

    #[test]
    fn test_certificate_anchor_is_not_a_position() {
        assert!(matches!(
            parse("certificate anchor trusted"),
            Err(ParserError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn test_certificate_positions() {
        let requirement = parse_requirement("certificate 2 trusted");
        let Requirement::Certificate(CertificateConstraint::Trusted { position, .. }) =
            requirement
        else {
            panic!("expected trusted constraint");
        };
        assert!(
            matches!(position, CertificatePosition::PositiveFromLeaf { n: 2, .. })
        );

        let requirement = parse_requirement("cert -1 trusted");
        let Requirement::Certificate(CertificateConstraint::Trusted { position, .. }) =
            requirement
        else {
            panic!("expected trusted constraint");
        };
        assert!(
            matches!(position, CertificatePosition::NegativeFromAnchor { n: 1, .. })
        );
    }

    #[test]
    fn test_certificate_element_with_match() {
        let requirement = parse_requirement(r#"certificate leaf[subject.OU] = "59GAB85EFG""#);
        let Requirement::Certificate(CertificateConstraint::Element {
            position,
            key,
            match_expr,
        }) = requirement
        else {
            panic!("expected element constraint");
        };
        assert!(matches!(position, CertificatePosition::Leaf { .. }));
        assert_eq!(key.value(), "subject.OU");
        assert!(matches!(
            match_expr,
            MatchExpr::Infix {
                operator: InfixOperator::Equal,
                ..
            }
        ));
    }

    #[test]
    fn test_certificate_element_implicit_exists() {
        let requirement =
            parse_requirement("certificate -1[field.1.2.840.113635.100.6.2.6]");
        assert!(matches!(
            requirement,
            Requirement::Certificate(CertificateConstraint::ElementImplicitExists { .. })
        ));
    }

    #[test]
    fn test_anchor_hash_constant() {
        let requirement =
            parse_requirement(r#"anchor = H"d5800a216ffd83b116b7b0f6047cb7f570f49329""#);
        assert!(matches!(
            requirement,
            Requirement::Certificate(CertificateConstraint::WholeHashConstant { .. })
        ));
    }

    #[test]
    fn test_info_exists() {
        let requirement = parse_requirement("info[CFBundleVersion] exists");
        let Requirement::Info(constraint) = requirement else {
            panic!("expected info constraint");
        };
        assert!(matches!(
            constraint.match_expr,
            MatchExpr::UnarySuffixExists { .. }
        ));
    }

    #[test]
    fn test_info_requires_match_expression() {
        assert!(matches!(
            parse("info[CFBundleVersion]"),
            Err(ParserError::InvalidInfo(_))
        ));
    }

    #[test]
    fn test_wildcard_forms() {
        let prefix = parse_requirement(r#"info[k] = *tail"#);
        let Requirement::Info(constraint) = prefix else { panic!() };
        assert!(matches!(
            constraint.match_expr,
            MatchExpr::InfixEqualsWildcard {
                wildcard: WildcardString::Prefix { .. },
                ..
            }
        ));

        let postfix = parse_requirement(r#"info[k] = head*"#);
        let Requirement::Info(constraint) = postfix else { panic!() };
        assert!(matches!(
            constraint.match_expr,
            MatchExpr::InfixEqualsWildcard {
                wildcard: WildcardString::Postfix { .. },
                ..
            }
        ));

        let both = parse_requirement(r#"info[k] = *middle*"#);
        let Requirement::Info(constraint) = both else { panic!() };
        assert!(matches!(
            constraint.match_expr,
            MatchExpr::InfixEqualsWildcard {
                wildcard: WildcardString::Both { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_wildcard_rejected_after_inequality() {
        assert!(matches!(
            parse("info[k] <= *tail"),
            Err(ParserError::InvalidMatchExpr(_))
        ));
        assert!(matches!(
            parse("info[k] <= tail*"),
            Err(ParserError::InvalidMatchExpr(_))
        ));
    }

    #[test]
    fn test_unquoted_digit_leading_match_value_rejected() {
        assert!(matches!(
            parse("info[CFBundleVersion] >= 17.4.2"),
            Err(ParserError::InvalidMatchExpr(_))
        ));
        assert!(parse(r#"info[CFBundleVersion] >= "17.4.2""#).is_ok());
    }

    #[test]
    fn test_cdhash_variants() {
        let requirement =
            parse_requirement(r#"cdhash H"d5800a216ffd83b116b7b0f6047cb7f570f49329""#);
        assert!(matches!(
            requirement,
            Requirement::CodeDirectoryHash(
                crate::ast::CodeDirectoryHashConstraint::HashConstant { .. }
            )
        ));

        let requirement = parse_requirement(r#"cdhash "/path with spaces/cert.cer""#);
        assert!(matches!(
            requirement,
            Requirement::CodeDirectoryHash(
                crate::ast::CodeDirectoryHashConstraint::FilePath { .. }
            )
        ));
    }

    #[test]
    fn test_comments_are_invisible_to_the_grammar() {
        let plain = parse_requirement("anchor apple");
        let commented = parse_requirement("anchor /* note */ apple");
        assert_eq!(plain.text_form(), commented.text_form());
    }

    #[test]
    fn test_requirement_set() {
        let result = parse(
            "host => anchor apple and identifier com.apple.perl    \
             designated => entitlement[\"com.apple.security.app-sandbox\"] exists",
        )
        .unwrap();
        let ParseResult::RequirementSet(set) = result else {
            panic!("expected a requirement set");
        };
        assert_eq!(set.len(), 2);
        assert!(set.get(crate::ast::RequirementTag::Host).is_some());
        assert!(set.get(crate::ast::RequirementTag::Designated).is_some());
    }

    #[test]
    fn test_requirement_set_duplicate_tag() {
        assert!(matches!(
            parse("host => anchor apple host => anchor trusted"),
            Err(ParserError::InvalidRequirementSet(_))
        ));
    }

    #[test]
    fn test_requirement_set_requires_leading_tag() {
        assert!(matches!(
            parse("host anchor apple => anchor trusted"),
            Err(ParserError::InvalidRequirementSet(_))
        ));
    }

    #[test]
    fn test_tag_keyword_without_marker_is_a_requirement() {
        // `host` with no => marker falls through to requirement parsing,
        // where it is not a recognized constraint keyword.
        assert!(parse("host").is_err());
    }

    #[test]
    fn test_adjacent_requirements_are_invalid() {
        assert!(matches!(
            parse("anchor apple anchor apple"),
            Err(ParserError::Invalid(_))
        ));
    }

    #[test]
    fn test_dangling_and() {
        assert!(matches!(
            parse(r#"identifier "a" and"#),
            Err(ParserError::InvalidAnd(_))
        ));
    }

    #[test]
    fn test_dangling_negation() {
        assert!(matches!(
            parse(r#"identifier "a" and !"#),
            Err(ParserError::InvalidNegation(_))
        ));
    }

    #[test]
    fn test_empty_parentheses() {
        assert!(matches!(parse("()"), Err(ParserError::Invalid(_))));
    }
}
