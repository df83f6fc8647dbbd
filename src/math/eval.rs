//! Expression evaluation

use thiserror::Error;

use super::normalize::normalize;
use super::parser::{BinaryOp, Expr, parse};

/// Why a spoken calculation could not produce a number
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Nothing symbolic left after filtering
    #[error("no expression found")]
    NoExpression,

    /// A bare number is not a calculation request
    #[error("expression has no operator: {0}")]
    MissingOperator(String),

    /// Construct outside the restricted grammar
    #[error("invalid expression: {0}")]
    Parse(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("square root of negative number {0}")]
    NegativeRoot(f64),

    /// Overflow or a result outside the reals, e.g. `(-8)^0.5`
    #[error("result is not a finite real number")]
    NonFinite,
}

impl EvalError {
    /// True for failures raised while folding a well-formed tree
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::DivisionByZero | Self::NegativeRoot(_) | Self::NonFinite
        )
    }

    /// True for failures raised before evaluation starts
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !self.is_arithmetic()
    }
}

/// Fold an expression tree to a number
///
/// # Errors
///
/// Returns an arithmetic [`EvalError`] on division by zero, square root of a
/// negative operand, or any non-finite intermediate result
pub fn evaluate(expr: &Expr) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(value) if value.is_finite() => Ok(*value),
        Expr::Number(_) => Err(EvalError::NonFinite),
        Expr::UnaryMinus(operand) => Ok(-evaluate(operand)?),
        Expr::SquareRoot(operand) => {
            let value = evaluate(operand)?;
            if value < 0.0 {
                return Err(EvalError::NegativeRoot(value));
            }
            Ok(value.sqrt())
        }
        Expr::BinaryOp(op, left, right) => {
            let l = evaluate(left)?;
            let r = evaluate(right)?;
            let value = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => {
                    if r == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    l / r
                }
                BinaryOp::Pow => l.powf(r),
            };
            if value.is_finite() {
                Ok(value)
            } else {
                Err(EvalError::NonFinite)
            }
        }
    }
}

/// Normalize, parse and evaluate a spoken calculation
///
/// # Errors
///
/// Returns the first [`EvalError`] raised along the pipeline
pub fn calculate(utterance: &str) -> Result<f64, EvalError> {
    let normalized = normalize(utterance)?;
    let expr = parse(&normalized)?;
    evaluate(&expr)
}

/// Render a result for speech: integers without a fraction, otherwise at
/// most four decimals with trailing zeros trimmed
#[must_use]
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let rendered = format!("{value:.4}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_calculation() {
        assert_eq!(calculate("2 vezes 3 mais 4").unwrap(), 10.0);
        assert_eq!(calculate("(1 mais 2) vezes 3").unwrap(), 9.0);
        assert_eq!(calculate("7 dividido por 2").unwrap(), 3.5);
    }

    #[test]
    fn test_matches_float_semantics() {
        let cases = [
            ("1+2*3", 1.0 + 2.0 * 3.0),
            ("10-4-3", 10.0 - 4.0 - 3.0),
            ("8/4/2", 8.0 / 4.0 / 2.0),
            ("(1+2)*(3-4)/5", (1.0 + 2.0) * (3.0 - 4.0) / 5.0),
            ("0.1+0.2", 0.1 + 0.2),
            ("-3*-2", -3.0 * -2.0),
            ("2-(-(3))", 2.0 - (-3.0)),
        ];
        for (input, expected) in cases {
            let got = evaluate(&parse(input).unwrap()).unwrap();
            assert!((got - expected).abs() < f64::EPSILON, "{input}: {got} != {expected}");
        }
    }

    #[test]
    fn test_powers_and_roots() {
        assert_eq!(calculate("2 elevado a 10").unwrap(), 1024.0);
        assert_eq!(calculate("raiz quadrada de 16 mais 9").unwrap(), 13.0);
        assert_eq!(evaluate(&parse("-2^2").unwrap()).unwrap(), -4.0);
    }

    #[test]
    fn test_division_by_zero_is_arithmetic_error() {
        let err = calculate("dez dividido por zero").unwrap_err();
        assert_eq!(err, EvalError::DivisionByZero);
        assert!(err.is_arithmetic());
    }

    #[test]
    fn test_negative_root_is_arithmetic_error() {
        let err = evaluate(&parse("sqrt-4").unwrap()).unwrap_err();
        assert_eq!(err, EvalError::NegativeRoot(-4.0));
        assert!(err.is_arithmetic());
    }

    #[test]
    fn test_non_finite_power() {
        assert_eq!(evaluate(&parse("(-8)^0.5").unwrap()), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_overflow_is_arithmetic_error() {
        let near_max = "9".repeat(308);
        let err = calculate(&format!("{near_max} mais {near_max}")).unwrap_err();
        assert_eq!(err, EvalError::NonFinite);
        assert!(err.is_arithmetic());

        let wide = "1".repeat(200);
        assert_eq!(
            calculate(&format!("{wide} vezes {wide}")),
            Err(EvalError::NonFinite)
        );
        assert_eq!(
            evaluate(&parse(&format!("-{near_max}-{near_max}")).unwrap()),
            Err(EvalError::NonFinite)
        );
    }

    #[test]
    fn test_literal_too_large_is_arithmetic_error() {
        let huge = "9".repeat(400);
        assert_eq!(
            calculate(&format!("{huge} menos {huge}0")),
            Err(EvalError::NonFinite)
        );
        assert_eq!(
            evaluate(&parse(&format!("sqrt{huge}")).unwrap()),
            Err(EvalError::NonFinite)
        );
    }

    #[test]
    fn test_validation_errors() {
        assert!(calculate("42").unwrap_err().is_validation());
        assert!(calculate("2 mais").unwrap_err().is_validation());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-2.25), "-2.25");
    }
}
