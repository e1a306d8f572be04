#[cfg(test)]
mod match_eval_tests {
    use std::cmp::Ordering;

    use crate::evaluator::match_eval::{evaluate_exists, numeric_compare};
    use crate::evaluator::subject::Value;

    #[test]
    fn test_numeric_compare_digit_runs_beat_lexicographic_order() {
        assert_eq!(numeric_compare("17.4", "7.4"), Ordering::Greater);
        assert_eq!(numeric_compare("7.4", "17.4"), Ordering::Less);
    }

    #[test]
    fn test_numeric_compare_multi_digit_components() {
        assert_eq!(numeric_compare("17.4.10", "17.4.2"), Ordering::Greater);
        assert_eq!(numeric_compare("17.4.2", "17.4.10"), Ordering::Less);
    }

    #[test]
    fn test_numeric_compare_equal() {
        assert_eq!(numeric_compare("17.4.2", "17.4.2"), Ordering::Equal);
        assert_eq!(numeric_compare("", ""), Ordering::Equal);
    }

    #[test]
    fn test_numeric_compare_leading_zeros() {
        assert_eq!(numeric_compare("007", "7"), Ordering::Equal);
        assert_eq!(numeric_compare("1.02", "1.2"), Ordering::Equal);
    }

    #[test]
    fn test_numeric_compare_prefix_is_less() {
        assert_eq!(numeric_compare("17.4", "17.4.2"), Ordering::Less);
        assert_eq!(numeric_compare("17.4.2", "17.4"), Ordering::Greater);
    }

    #[test]
    fn test_numeric_compare_non_digits_compare_bytewise() {
        assert_eq!(numeric_compare("abc", "abd"), Ordering::Less);
        assert_eq!(numeric_compare("a1b", "a1c"), Ordering::Less);
    }

    #[test]
    fn test_exists_accepts_everything_but_false() {
        assert!(evaluate_exists(Some(&Value::String(String::new()))).is_ok());
        assert!(evaluate_exists(Some(&Value::Integer(0))).is_ok());
        assert!(evaluate_exists(Some(&Value::Bool(true))).is_ok());
        assert!(evaluate_exists(Some(&Value::Array(Vec::new()))).is_ok());
        assert!(evaluate_exists(Some(&Value::Bool(false))).is_err());
        assert!(evaluate_exists(None).is_err());
    }
}

#[cfg(test)]
mod evaluator_tests {
    use sha1::Sha1;
    use sha2::{Digest, Sha256};

    use crate::ast::{ParseResult, Requirement};
    use crate::evaluator::evaluate::{evaluate, hex_string, EvalError};
    use crate::host::{StaticCertificate, StaticSubject};

    fn requirement(source: &str) -> Requirement {
        match crate::api::parse(source).unwrap() {
            ParseResult::Requirement(requirement) => requirement,
            ParseResult::RequirementSet(_) => panic!("expected a single requirement"),
        }
    }

    #[test]
    fn test_identifier_match() {
        let req = requirement(r#"identifier "com.apple.Safari""#);
        let subject = StaticSubject::new().with_identifier("com.apple.Safari");
        assert!(evaluate(&req, &subject).unwrap().is_satisfied());

        let other = StaticSubject::new().with_identifier("com.apple.Terminal");
        let evaluation = evaluate(&req, &other).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("com.apple.Terminal"));
    }

    #[test]
    fn test_missing_identifier_is_unsatisfied_not_an_error() {
        let req = requirement(r#"identifier "com.apple.Safari""#);
        let evaluation = evaluate(&req, &StaticSubject::new()).unwrap();
        assert!(!evaluation.is_satisfied());
        assert_eq!(evaluation.explanation(), "The subject has no identifier.");
    }

    #[test]
    fn test_info_numeric_comparison() {
        let req = requirement(r#"info[CFBundleVersion] >= "17.4.2""#);
        let satisfied = StaticSubject::new().with_info_value("CFBundleVersion", "17.4.10");
        assert!(evaluate(&req, &satisfied).unwrap().is_satisfied());

        let unsatisfied = StaticSubject::new().with_info_value("CFBundleVersion", "7.4.2");
        assert!(!evaluate(&req, &unsatisfied).unwrap().is_satisfied());
    }

    #[test]
    fn test_info_type_mismatch_names_the_type() {
        let req = requirement(r#"info[CFBundleVersion] >= "17.4.2""#);
        let subject = StaticSubject::new().with_info_value("CFBundleVersion", true);
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("boolean"));
    }

    #[test]
    fn test_info_missing_key() {
        let req = requirement("info[CFBundleVersion] exists");
        let subject = StaticSubject::new().with_info_value("CFBundleName", "Safari");
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert_eq!(evaluation.explanation(), "Value not present.");
    }

    #[test]
    fn test_entitlement_exists_rejects_false() {
        let req = requirement(r#"entitlement["com.apple.security.app-sandbox"] exists"#);
        let sandboxed =
            StaticSubject::new().with_entitlement("com.apple.security.app-sandbox", true);
        assert!(evaluate(&req, &sandboxed).unwrap().is_satisfied());

        let opted_out =
            StaticSubject::new().with_entitlement("com.apple.security.app-sandbox", false);
        assert!(!evaluate(&req, &opted_out).unwrap().is_satisfied());
    }

    #[test]
    fn test_wildcard_matching() {
        let req = requirement(r#"info[CFBundleIdentifier] = com.apple.*"#);
        let subject =
            StaticSubject::new().with_info_value("CFBundleIdentifier", "com.apple.Safari");
        assert!(evaluate(&req, &subject).unwrap().is_satisfied());

        let other = StaticSubject::new().with_info_value("CFBundleIdentifier", "org.example");
        assert!(!evaluate(&req, &other).unwrap().is_satisfied());
    }

    #[test]
    fn test_cdhash_comparison_is_case_insensitive() {
        let hash: Vec<u8> = vec![0xd5, 0x80, 0x0a, 0x21];
        let req = requirement(r#"cdhash H"D5800A21""#);
        let subject = StaticSubject::new().with_code_directory_hash(hash);
        assert!(evaluate(&req, &subject).unwrap().is_satisfied());
    }

    #[test]
    fn test_cdhash_mismatch() {
        let req = requirement(r#"cdhash H"d5800a21""#);
        let subject = StaticSubject::new().with_code_directory_hash(vec![0x00]);
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("d5800a21"));
    }

    #[test]
    fn test_certificate_leaf_element() {
        let req = requirement(r#"certificate leaf[subject.OU] = "59GAB85EFG""#);
        let leaf = StaticCertificate::new(b"leaf".to_vec()).with_organizational_unit("59GAB85EFG");
        let subject = StaticSubject::new().with_certificates(vec![leaf]);
        assert!(evaluate(&req, &subject).unwrap().is_satisfied());
    }

    #[test]
    fn test_certificate_position_resolution() {
        let chain = vec![
            StaticCertificate::new(b"leaf".to_vec()).with_common_name("Leaf"),
            StaticCertificate::new(b"mid".to_vec()).with_common_name("Intermediate"),
            StaticCertificate::new(b"root".to_vec()).with_common_name("Root"),
        ];
        let subject = StaticSubject::new().with_certificates(chain);

        for (source, expected) in [
            (r#"certificate leaf[subject.CN] = "Leaf""#, true),
            (r#"certificate root[subject.CN] = "Root""#, true),
            (r#"certificate 1[subject.CN] = "Intermediate""#, true),
            (r#"certificate -1[subject.CN] = "Root""#, true),
            (r#"certificate -2[subject.CN] = "Intermediate""#, true),
            (r#"certificate 1[subject.CN] = "Leaf""#, false),
        ] {
            let req = requirement(source);
            assert_eq!(
                evaluate(&req, &subject).unwrap().is_satisfied(),
                expected,
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_certificate_position_out_of_range() {
        let subject = StaticSubject::new()
            .with_certificates(vec![StaticCertificate::new(b"leaf".to_vec())]);
        let req = requirement(r#"certificate 4[subject.CN] = "Leaf""#);
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("certificate 4"));
    }

    #[test]
    fn test_certificate_whole_hash() {
        let der = b"leaf certificate".to_vec();
        let digest = hex_string(&Sha1::digest(&der));
        let subject =
            StaticSubject::new().with_certificates(vec![StaticCertificate::new(der)]);
        let req = requirement(&format!(r#"certificate leaf = H"{}""#, digest));
        assert!(evaluate(&req, &subject).unwrap().is_satisfied());
    }

    #[test]
    fn test_oid_field_exists() {
        let leaf = StaticCertificate::new(b"leaf".to_vec()).with_oid("1.2.840.113635.100.6.2.6");
        let subject = StaticSubject::new().with_certificates(vec![leaf]);

        let implicit = requirement("certificate leaf[field.1.2.840.113635.100.6.2.6]");
        assert!(evaluate(&implicit, &subject).unwrap().is_satisfied());

        let explicit = requirement("certificate leaf[field.1.2.840.113635.100.6.2.6] exists");
        assert!(evaluate(&explicit, &subject).unwrap().is_satisfied());

        let missing = requirement("certificate leaf[field.1.2.3]");
        assert!(!evaluate(&missing, &subject).unwrap().is_satisfied());
    }

    #[test]
    fn test_oid_field_only_supports_existence() {
        let leaf = StaticCertificate::new(b"leaf".to_vec()).with_oid("1.2.3");
        let subject = StaticSubject::new().with_certificates(vec![leaf]);
        let req = requirement(r#"certificate leaf[field.1.2.3] = "x""#);
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("existence"));
    }

    #[test]
    fn test_unsupported_element_key() {
        let subject = StaticSubject::new()
            .with_certificates(vec![StaticCertificate::new(b"leaf".to_vec())]);
        let req = requirement(r#"certificate leaf[issuer.CN] = "x""#);
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("issuer.CN"));
    }

    #[test]
    fn test_anchor_apple_delegates_to_host() {
        let req = requirement("anchor apple");
        let accepted = StaticSubject::new().with_valid_requirement("anchor apple");
        assert!(evaluate(&req, &accepted).unwrap().is_satisfied());
        assert!(!evaluate(&req, &StaticSubject::new()).unwrap().is_satisfied());
    }

    #[test]
    fn test_host_error_surfaces_as_eval_error() {
        let req = requirement("anchor trusted");
        let subject = StaticSubject::new().with_validity_error("keychain unavailable");
        assert_eq!(
            evaluate(&req, &subject),
            Err(EvalError::Host("keychain unavailable".to_string()))
        );
    }

    #[test]
    fn test_anchor_apple_generic_uses_root_table() {
        // A synthetic root is never in the accepted table.
        let subject = StaticSubject::new()
            .with_certificates(vec![StaticCertificate::new(b"not apple".to_vec())]);
        let req = requirement("anchor apple generic");
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(!evaluation.is_satisfied());
        assert!(evaluation.explanation().contains("Apple root"));
        // Sanity: the digest of the synthetic root really is not listed.
        let digest = hex_string(&Sha256::digest(b"not apple"));
        assert!(!crate::evaluator::apple_roots::is_accepted_apple_root(&digest));
    }

    #[test]
    fn test_compound_combinators() {
        let subject = StaticSubject::new().with_identifier("a");
        let id_a = r#"identifier "a""#;
        let id_b = r#"identifier "b""#;

        for (source, expected) in [
            (format!("{id_a} and {id_a}"), true),
            (format!("{id_a} and {id_b}"), false),
            (format!("{id_a} or {id_b}"), true),
            (format!("{id_b} or {id_b}"), false),
            (format!("!{id_b}"), true),
            (format!("!!{id_a}"), true),
            (format!("({id_a})"), true),
        ] {
            let req = requirement(&source);
            assert_eq!(
                evaluate(&req, &subject).unwrap().is_satisfied(),
                expected,
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_both_branches_are_always_evaluated() {
        let subject = StaticSubject::new().with_identifier("a");
        let req = requirement(r#"identifier "b" or identifier "a""#);
        let evaluation = evaluate(&req, &subject).unwrap();
        assert!(evaluation.is_satisfied());
        assert_eq!(evaluation.children().len(), 2);
        assert!(!evaluation.children()[0].is_satisfied());
        assert!(evaluation.children()[1].is_satisfied());
    }

    #[test]
    fn test_evaluation_mirrors_requirement_shape() {
        let req = requirement(r#"(identifier "a" or anchor trusted) and !anchor apple"#);
        let evaluation = evaluate(&req, &StaticSubject::new()).unwrap();

        fn shapes_match(
            requirement: &crate::ast::Requirement,
            evaluation: &crate::evaluator::Evaluation,
        ) -> bool {
            let children = requirement.children();
            children.len() == evaluation.children().len()
                && children
                    .iter()
                    .zip(evaluation.children())
                    .all(|(r, e)| shapes_match(r, e))
        }
        assert!(shapes_match(&req, &evaluation));
    }
}
