use anyhow::Result;

use polysql::query::parser::ast::{BinaryOperator, Expression, ExpressionKind, TernaryOperator, UnaryOperator};

#[path = "../common/mod.rs"]
mod common;

use common::{column_default, select_expression};

fn n(text: &str) -> Expression {
    Expression::number(text)
}

fn bin(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::binary(op, left, right)
}

#[test]
fn test_structural_equality_ignores_location() -> Result<()> {
    assert_ne!(Expression::string("x"), Expression::string("y"));
    assert_eq!(Expression::string("x"), Expression::string("x"));

    let parsed = select_expression("'x' + 'y'")?;
    let built = bin(BinaryOperator::Add, Expression::string("x"), Expression::string("y"));
    assert_eq!(parsed, built);
    Ok(())
}

#[test]
fn test_multiplication_is_left_associative() -> Result<()> {
    use BinaryOperator::Multiply;

    let parsed = column_default("1*2*3")?;
    assert_eq!(parsed, bin(Multiply, bin(Multiply, n("1"), n("2")), n("3")));
    assert_ne!(parsed, bin(Multiply, n("1"), bin(Multiply, n("2"), n("3"))));
    Ok(())
}

#[test]
fn test_multiplication_binds_tighter_than_addition() -> Result<()> {
    use BinaryOperator::{Add, Multiply};

    assert_eq!(column_default("1*2+3")?, bin(Add, bin(Multiply, n("1"), n("2")), n("3")));
    assert_eq!(column_default("1+2*3")?, bin(Add, n("1"), bin(Multiply, n("2"), n("3"))));
    Ok(())
}

#[test]
fn test_comparison_is_looser_than_arithmetic() -> Result<()> {
    use BinaryOperator::{Equals, Multiply};

    assert_eq!(column_default("1=2*3")?, bin(Equals, n("1"), bin(Multiply, n("2"), n("3"))));
    Ok(())
}

#[test]
fn test_unary_operators() -> Result<()> {
    assert_eq!(column_default("~1")?, Expression::unary(UnaryOperator::BitNot, n("1")));
    assert_eq!(column_default("-1")?, Expression::unary(UnaryOperator::Negate, n("1")));
    assert_eq!(
        select_expression("- ~1")?,
        Expression::unary(UnaryOperator::Negate, Expression::unary(UnaryOperator::BitNot, n("1")))
    );
    Ok(())
}

#[test]
fn test_concat_and_bitwise_share_additive_tier() -> Result<()> {
    use BinaryOperator::{BitAnd, Concat, Subtract};

    let parsed = select_expression("a || b & c - d")?;
    let expected = bin(
        Subtract,
        bin(BitAnd, bin(Concat, Expression::name("a"), Expression::name("b")), Expression::name("c")),
        Expression::name("d"),
    );
    assert_eq!(parsed, expected);
    Ok(())
}

#[test]
fn test_logical_precedence() -> Result<()> {
    use BinaryOperator::{And, Equals, Or};

    let a = || bin(Equals, Expression::name("a"), n("1"));
    let b = || bin(Equals, Expression::name("b"), n("2"));
    let c = || bin(Equals, Expression::name("c"), n("3"));

    let parsed = select_expression("a = 1 OR b = 2 AND NOT c = 3")?;
    let expected = bin(Or, a(), bin(And, b(), Expression::unary(UnaryOperator::Not, c())));
    assert_eq!(parsed, expected);
    Ok(())
}

#[test]
fn test_like_in_between_is() -> Result<()> {
    let like = select_expression("name NOT LIKE 'a%'")?;
    assert_eq!(like, bin(BinaryOperator::NotLike, Expression::name("name"), Expression::string("a%")));

    let between = select_expression("x BETWEEN 1 AND 2 + 3")?;
    assert_eq!(
        between,
        Expression::ternary(
            TernaryOperator::Between,
            Expression::name("x"),
            n("1"),
            bin(BinaryOperator::Add, n("2"), n("3")),
        )
    );

    let in_list = select_expression("id NOT IN (1, 2)")?;
    match in_list.kind {
        ExpressionKind::InList { negated, candidates, .. } => {
            assert!(negated);
            assert_eq!(candidates, vec![n("1"), n("2")]);
        }
        other => panic!("Expected IN list, got {:?}", other),
    }

    let is_null = select_expression("x IS NOT NULL")?;
    assert_eq!(is_null, Expression::unary(UnaryOperator::IsNotNull, Expression::name("x")));
    Ok(())
}

#[test]
fn test_comparisons_do_not_chain() {
    assert!(polysql::parse("SELECT 1 < 2 < 3").is_err());
}

#[test]
fn test_calls_and_casts() -> Result<()> {
    let call = select_expression("dbo.fn(1, 'a')")?;
    match call.kind {
        ExpressionKind::Call { function, arguments } => {
            assert_eq!(function.to_string(), "dbo.fn");
            assert_eq!(arguments.len(), 2);
        }
        other => panic!("Expected call, got {:?}", other),
    }

    let count = select_expression("count(*)")?;
    assert_eq!(count.to_string(), "count(*)");

    let cast = select_expression("'draft'::character varying")?;
    assert_eq!(cast.to_string(), "CAST('draft' AS character varying)");

    let cast = select_expression("CAST(x AS decimal(10, 2))")?;
    assert_eq!(cast.to_string(), "CAST(x AS decimal(10, 2))");
    Ok(())
}

#[test]
fn test_call_of_non_function() {
    let err = polysql::parse("SELECT 'x'(1)").unwrap_err();
    assert!(err.message.contains("call of non-function"), "{}", err);
}

#[test]
fn test_parenthesized_name_call_is_rejected() {
    let err = polysql::parse("SELECT (a)(1)").unwrap_err();
    assert!(err.message.contains("call of non-function"), "{}", err);
}

#[test]
fn test_parameters_and_subqueries() -> Result<()> {
    assert!(matches!(select_expression("@id")?.kind, ExpressionKind::ParameterRef(ref p) if p == "@id"));
    assert!(matches!(select_expression("$1")?.kind, ExpressionKind::ParameterRef(_)));
    assert!(matches!(
        select_expression("EXISTS (SELECT 1 FROM t)")?.kind,
        ExpressionKind::Exists(_)
    ));
    assert!(matches!(select_expression("(SELECT max(id) FROM t)")?.kind, ExpressionKind::Subquery(_)));
    Ok(())
}
