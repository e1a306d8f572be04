#[cfg(test)]
mod ast_tests {
    use crate::ast::{ParseResult, Requirement};
    use crate::parser::parse_tokens;
    use crate::tokenizer::{tokenize, SourceRange};

    fn parse_requirement(source: &str) -> Requirement {
        match parse_tokens(&tokenize(source).unwrap()).unwrap() {
            ParseResult::Requirement(requirement) => requirement,
            ParseResult::RequirementSet(_) => panic!("expected a single requirement"),
        }
    }

    #[test]
    fn test_source_range_join() {
        let a = SourceRange::new(3, 7);
        let b = SourceRange::new(10, 12);
        assert_eq!(a.join(b), SourceRange::new(3, 12));
        assert_eq!(b.join(a), SourceRange::new(3, 12));
        assert!(SourceRange::new(0, 20).contains(&a));
        assert!(!a.contains(&b));
    }

    #[test]
    fn test_text_form_preserves_cert_spelling() {
        assert_eq!(
            parse_requirement("cert -1 trusted").text_form(),
            "cert -1 trusted"
        );
        assert_eq!(
            parse_requirement("certificate leaf trusted").text_form(),
            "certificate leaf trusted"
        );
    }

    #[test]
    fn test_text_form_preserves_quoting() {
        assert_eq!(
            parse_requirement(r#"identifier "com.apple.Safari""#).text_form(),
            r#"identifier "com.apple.Safari""#
        );
        assert_eq!(
            parse_requirement("identifier com.apple.perl").text_form(),
            "identifier com.apple.perl"
        );
        assert_eq!(
            parse_requirement(r#"identifier = "x""#).text_form(),
            r#"identifier = "x""#
        );
    }

    #[test]
    fn test_text_form_canonicalizes_whitespace_and_comments() {
        let requirement = parse_requirement("anchor /* note */  apple\tand !  anchor trusted");
        assert_eq!(requirement.text_form(), "anchor apple and ! anchor trusted");
    }

    #[test]
    fn test_negation_and_parentheses_text_form() {
        assert_eq!(
            parse_requirement(r#"!!identifier "x""#).text_form(),
            r#"! ! identifier "x""#
        );
        assert_eq!(
            parse_requirement("(anchor apple)").text_form(),
            "(anchor apple)"
        );
    }

    #[test]
    fn test_compound_children_order() {
        let requirement = parse_requirement("anchor apple and anchor trusted");
        let children = requirement.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].text_form(), "anchor apple");
        assert_eq!(children[1].text_form(), "anchor trusted");
    }

    #[test]
    fn test_constraints_have_no_children() {
        let requirement = parse_requirement(r#"certificate leaf[subject.OU] = "X""#);
        assert!(requirement.is_constraint());
        assert!(requirement.children().is_empty());
    }

    #[test]
    fn test_requirement_set_text_form_reparses() {
        let source = "designated => anchor apple host => anchor trusted";
        let ParseResult::RequirementSet(set) = parse_tokens(&tokenize(source).unwrap()).unwrap()
        else {
            panic!("expected a set");
        };
        let canonical = set.text_form();
        let ParseResult::RequirementSet(reparsed) =
            parse_tokens(&tokenize(&canonical).unwrap()).unwrap()
        else {
            panic!("expected a set after reparse");
        };
        assert_eq!(set.len(), reparsed.len());
        assert_eq!(canonical, reparsed.text_form());
    }
}
