use sift_lang::{
    ast::{BinOp, Expr, TokenKind},
    parser::{MAX_NESTING, ParseError, Parser},
};

fn parse(input: &str) -> Result<Expr, ParseError> {
    Parser::from_source(input).parse()
}

fn shape(input: &str) -> String {
    parse(input).unwrap().to_string()
}

fn field(name: &str) -> Box<Expr> {
    Box::new(Expr::Field(name.to_string()))
}

// ============================================================================
// Atoms
// ============================================================================

#[test]
fn test_atoms() {
    assert_eq!(parse("amt").unwrap(), Expr::Field("amt".into()));
    assert_eq!(parse("75.5").unwrap(), Expr::Number(75.5));
    assert_eq!(parse("'grocery'").unwrap(), Expr::String("grocery".into()));
    assert_eq!(parse("(amt)").unwrap(), Expr::Field("amt".into()));
}

#[test]
fn test_comparison() {
    assert_eq!(
        parse("amt > 75.0").unwrap(),
        Expr::BinaryOp {
            op: BinOp::GreaterThan,
            left: field("amt"),
            right: Box::new(Expr::Number(75.0)),
        }
    );
}

#[test]
fn test_all_comparison_operators() {
    let cases = [
        ("=", BinOp::Equal),
        ("<>", BinOp::NotEqual),
        ("<", BinOp::LessThan),
        ("<=", BinOp::LessEqual),
        (">", BinOp::GreaterThan),
        (">=", BinOp::GreaterEqual),
        ("=~", BinOp::Matches),
    ];

    for (symbol, expected) in cases {
        match parse(&format!("a {} b", symbol)).unwrap() {
            Expr::BinaryOp { op, .. } => assert_eq!(op, expected, "Failed for {}", symbol),
            other => panic!("expected binary op for {}, got {:?}", symbol, other),
        }
    }
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_multiplicative_binds_tighter() {
    assert_eq!(shape("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(shape("1 * 2 + 3 / 4"), "((1 * 2) + (3 / 4))");
}

#[test]
fn test_left_associative_arithmetic() {
    assert_eq!(shape("10 - 4 - 3"), "((10 - 4) - 3)");
    assert_eq!(shape("8 / 4 / 2"), "((8 / 4) / 2)");
}

#[test]
fn test_arithmetic_inside_comparison() {
    assert_eq!(shape("debit + credit > 4.5"), "((debit + credit) > 4.5)");
}

#[test]
fn test_and_or_equal_precedence() {
    // left to right, no precedence between and/or
    assert_eq!(shape("a = 1 or b = 2 and c = 3"), "(((a = 1) or (b = 2)) and (c = 3))");
    assert_eq!(shape("a = 1 and b = 2 or c = 3"), "(((a = 1) and (b = 2)) or (c = 3))");
}

#[test]
fn test_parentheses_group_conditions() {
    assert_eq!(
        shape("a = 1 or (b = 2 and c = 3)"),
        "((a = 1) or ((b = 2) and (c = 3)))"
    );
    assert_eq!(
        shape("(amt > 10 or amt < 5) and cat = \"grocery\""),
        "(((amt > 10) or (amt < 5)) and (cat = \"grocery\"))"
    );
}

#[test]
fn test_nested_condition_groups() {
    assert_eq!(
        shape("(cat = 'a' or cat = 'b') and (amt >= 100.0 or (cat = 'c' and amt > 75.0))"),
        "(((cat = \"a\") or (cat = \"b\")) and ((amt >= 100) or ((cat = \"c\") and (amt > 75))))"
    );
}

#[test]
fn test_parentheses_group_arithmetic() {
    assert_eq!(shape("(1 + 2) * 3"), "((1 + 2) * 3)");
    assert_eq!(shape("(amt - 5) * 2 > 10 and ok = 'y'"), "((((amt - 5) * 2) > 10) and (ok = \"y\"))");
    assert_eq!(shape("((amt))"), "amt");
}

#[test]
fn test_bare_operand_in_condition() {
    assert_eq!(shape("0 and (1 / 0 > 0)"), "(0 and ((1 / 0) > 0))");
}

// ============================================================================
// Unary operators
// ============================================================================

#[test]
fn test_unary_minus_applies_to_first_term() {
    assert_eq!(shape("-amt"), "(-amt)");
    assert_eq!(shape("-2 * 3 + 1"), "((-(2 * 3)) + 1)");
    assert_eq!(shape("+amt"), "(+amt)");
}

#[test]
fn test_unary_minus_only_at_expression_start() {
    assert!(parse("5 * -2").is_err());
    assert!(parse("--5").is_err());
    assert_eq!(shape("5 > -2"), "(5 > (-2))");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    assert_eq!(
        parse(""),
        Err(ParseError::UnexpectedEof {
            expected: "field, number or string".into()
        })
    );
}

#[test]
fn test_missing_right_operand() {
    assert!(matches!(parse("amt >"), Err(ParseError::UnexpectedEof { .. })));
    assert!(matches!(parse("amt +"), Err(ParseError::UnexpectedEof { .. })));
    assert!(matches!(parse("a = 1 and"), Err(ParseError::UnexpectedEof { .. })));
}

#[test]
fn test_missing_closing_paren() {
    assert!(matches!(
        parse("(1 + 2"),
        Err(ParseError::UnexpectedEof { expected }) if expected == "RPAREN"
    ));
}

#[test]
fn test_undefined_token_rejected() {
    match parse("amt % 2") {
        Err(ParseError::TrailingTokens { found, position }) => {
            assert_eq!(found.kind, TokenKind::Undef);
            assert_eq!(found.literal, "%");
            assert_eq!(position, 1);
        }
        other => panic!("expected trailing token error, got {:?}", other),
    }

    match parse("amt > !") {
        Err(ParseError::Expected { found, position, .. }) => {
            assert_eq!(found.kind, TokenKind::Undef);
            assert_eq!(position, 2);
        }
        other => panic!("expected token error, got {:?}", other),
    }
}

#[test]
fn test_chained_comparison_rejected() {
    assert!(matches!(parse("1 < 2 < 3"), Err(ParseError::TrailingTokens { .. })));
}

#[test]
fn test_unbalanced_close_paren() {
    assert!(matches!(parse("amt > 1)"), Err(ParseError::TrailingTokens { .. })));
}

#[test]
fn test_deep_nesting_rejected() {
    let n = 10_000;
    let input = format!("{}1{} > 0", "(".repeat(n), ")".repeat(n));
    assert_eq!(
        parse(&input),
        Err(ParseError::TooDeep {
            position: MAX_NESTING
        })
    );

    let condition = format!("{}a = 1{}", "(".repeat(n), ")".repeat(n));
    assert!(matches!(parse(&condition), Err(ParseError::TooDeep { .. })));
}

#[test]
fn test_nesting_up_to_limit_accepted() {
    let input = format!("{}1{} > 0", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(shape(&input), "(1 > 0)");

    let deeper = format!("{}1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    assert!(matches!(parse(&deeper), Err(ParseError::TooDeep { .. })));
}

#[test]
fn test_keyword_as_operand() {
    assert!(matches!(parse("and = 1"), Err(ParseError::Expected { .. })));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        parse("amt > )").unwrap_err().to_string(),
        "field, number or string expected, found RPAREN ')' at token 2"
    );
    assert_eq!(
        parse("(amt").unwrap_err().to_string(),
        "RPAREN expected, found end of input"
    );
}
