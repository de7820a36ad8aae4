//! 受限的四則運算求值器
//!
//! 只接受數字、`+ - * /`、一元正負號與括號，先解析成 [`Expr`] 再求值，
//! 不會執行任何程式碼。

use crate::utils::error::{CalcError, Result};
use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::fold_many0,
    sequence::{delimited, pair, preceded},
    IResult,
};
use thiserror::Error;

pub const MAX_EXPRESSION_LEN: usize = 512;
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("syntax error at position {position}")]
    Syntax { position: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("expression longer than {} characters", MAX_EXPRESSION_LEN)]
    TooLong,

    #[error("parentheses nested deeper than {} levels", MAX_NESTING_DEPTH)]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn evaluate(&self) -> std::result::Result<f64, ArithmeticError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Negate(inner) => -inner.evaluate()?,
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate()?;
                let rhs = rhs.evaluate()?;
                match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => {
                        if rhs == 0.0 {
                            return Err(ArithmeticError::DivisionByZero);
                        }
                        lhs / rhs
                    }
                }
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ArithmeticError::NonFinite)
        }
    }
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn number(input: &str) -> IResult<&str, Expr> {
    map_res(
        recognize(alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        ))),
        |literal: &str| literal.parse::<f64>().map(Expr::Number),
    )(input)
}

fn factor(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        number,
        delimited(char('('), expr, char(')')),
        map(preceded(char('-'), factor), |inner| {
            Expr::Negate(Box::new(inner))
        }),
        preceded(char('+'), factor),
    )))(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = factor(input)?;
    fold_many0(
        pair(
            alt((
                value(BinaryOp::Mul, char('*')),
                value(BinaryOp::Div, char('/')),
            )),
            factor,
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
    )(input)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(
            alt((
                value(BinaryOp::Add, char('+')),
                value(BinaryOp::Sub, char('-')),
            )),
            term,
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
    )(input)
}

fn check_limits(input: &str) -> std::result::Result<(), ArithmeticError> {
    if input.len() > MAX_EXPRESSION_LEN {
        return Err(ArithmeticError::TooLong);
    }

    let mut depth = 0usize;
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(ArithmeticError::TooDeep);
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// 解析運算式為語法樹
pub fn parse(input: &str) -> std::result::Result<Expr, ArithmeticError> {
    check_limits(input)?;

    match all_consuming(expr)(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ArithmeticError::Syntax {
            position: input.len() - e.input.len(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ArithmeticError::Syntax {
            position: input.len(),
        }),
    }
}

/// 解析並計算運算式，失敗時回傳 [`CalcError::InvalidExpression`]
pub fn evaluate(input: &str) -> Result<f64> {
    parse(input)
        .and_then(|parsed| parsed.evaluate())
        .map_err(|source| CalcError::InvalidExpression {
            expression: input.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ok(input: &str) -> f64 {
        evaluate(input).unwrap_or_else(|e| panic!("{} failed: {}", input, e))
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(eval_ok("2+2"), 4.0);
        assert_eq!(eval_ok("10/4"), 2.5);
        assert_eq!(eval_ok("7-10"), -3.0);
        assert_eq!(eval_ok("3*1.5"), 4.5);
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval_ok("2+3*4"), 14.0);
        assert_eq!(eval_ok("10-4-3"), 3.0);
        assert_eq!(eval_ok("100/10/5"), 2.0);
        assert_eq!(eval_ok("8/4*2"), 4.0);
        assert_eq!(eval_ok("1-2*3+4/2"), -3.0);
    }

    #[test]
    fn test_parentheses_and_unary_signs() {
        assert_eq!(eval_ok("(2+3)*4"), 20.0);
        assert_eq!(eval_ok("-(1+2)"), -3.0);
        assert_eq!(eval_ok("2*-3"), -6.0);
        assert_eq!(eval_ok("--2"), 2.0);
        assert_eq!(eval_ok("2++2"), 4.0);
        assert_eq!(eval_ok(" ( 1 + 1 ) * 3 "), 6.0);
    }

    #[test]
    fn test_decimal_forms() {
        assert_eq!(eval_ok(".5+.5"), 1.0);
        assert_eq!(eval_ok("5.+1"), 6.0);
        assert_eq!(eval_ok("0.1*10"), 1.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(parse("5/0").unwrap().evaluate(), Err(ArithmeticError::DivisionByZero));
        assert!(matches!(
            evaluate("5/0"),
            Err(CalcError::InvalidExpression {
                source: ArithmeticError::DivisionByZero,
                ..
            })
        ));
        assert!(matches!(
            evaluate("1/(2-2)"),
            Err(CalcError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_malformed_input() {
        for input in ["2+", "*3", "2 3", "()", "(1+2", "1+2)", "abc", "2^3", "1..2", ""] {
            assert!(
                matches!(
                    evaluate(input),
                    Err(CalcError::InvalidExpression {
                        source: ArithmeticError::Syntax { .. },
                        ..
                    })
                ),
                "expected syntax error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_syntax_error_position() {
        assert_eq!(parse("1+2)"), Err(ArithmeticError::Syntax { position: 3 }));
    }

    #[test]
    fn test_rejects_code() {
        assert!(evaluate("__import__('os').system('ls')").is_err());
    }

    #[test]
    fn test_limits() {
        let long = "1+".repeat(MAX_EXPRESSION_LEN) + "1";
        assert_eq!(parse(&long), Err(ArithmeticError::TooLong));

        let deep = format!("{}1{}", "(".repeat(70), ")".repeat(70));
        assert_eq!(parse(&deep), Err(ArithmeticError::TooDeep));

        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(eval_ok(&ok), 1.0);
    }

    #[test]
    fn test_non_finite_result() {
        let huge = format!("{}*{}", "9".repeat(200), "9".repeat(200));
        assert_eq!(
            parse(&huge).unwrap().evaluate(),
            Err(ArithmeticError::NonFinite)
        );
    }
}
