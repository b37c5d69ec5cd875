//! Exact decimal evaluation of a single binary operation.
//!
//! Operands arrive as the strings typed on the keypad and are parsed into
//! `BigDecimal`s, so `0.1 + 0.2` is `0.3`. Results are written back in plain
//! decimal notation, ready to be edited again as an operand.

use crate::keys::Operator;
use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// Significant digits kept when a quotient does not terminate.
pub const DEFAULT_DIVISION_PRECISION: u64 = 32;

/// Upper bound for the division precision; `BigDecimal` division carries
/// 100 significant digits before rounding.
pub const MAX_DIVISION_PRECISION: u64 = 100;

/// Value substituted for any failed operation.
pub const FALLBACK_RESULT: &str = "0";

/// Reasons an operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("invalid operand: {0:?}")]
    InvalidOperand(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// Evaluate `left op right` with the default division precision.
pub fn evaluate(left: &str, op: Operator, right: &str) -> Result<String, ArithmeticError> {
    evaluate_with_precision(left, op, right, DEFAULT_DIVISION_PRECISION)
}

/// Evaluate `left op right`, rounding non-terminating quotients to
/// `precision` significant digits (half-even). Quotients that terminate are
/// always exact. `precision` is clamped to `1..=MAX_DIVISION_PRECISION`.
pub fn evaluate_with_precision(
    left: &str,
    op: Operator,
    right: &str,
    precision: u64,
) -> Result<String, ArithmeticError> {
    let lhs = parse_operand(left)?;
    let rhs = parse_operand(right)?;
    let zero = BigDecimal::from(0);

    let value = match op {
        Operator::Add => lhs + rhs,
        Operator::Sub => lhs - rhs,
        Operator::Mul => lhs * rhs,
        Operator::Div => {
            if rhs == zero {
                return Err(ArithmeticError::DivisionByZero);
            }
            divide(&lhs, &rhs, precision)
        }
        Operator::Mod => {
            if rhs == zero {
                return Err(ArithmeticError::DivisionByZero);
            }
            // Truncated remainder: the sign follows the dividend.
            lhs % rhs
        }
    };

    Ok(format_plain(&value))
}

/// Evaluate, substituting [`FALLBACK_RESULT`] for any failure.
///
/// The keypad has no error display, so failures are logged and the
/// calculation simply produces zero.
pub fn evaluate_or_zero(left: &str, op: Operator, right: &str, precision: u64) -> String {
    match evaluate_with_precision(left, op, right, precision) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(%left, %op, %right, error = %e, "Calculation failed, showing 0");
            FALLBACK_RESULT.to_string()
        }
    }
}

/// Parse an operand as typed on the keypad.
///
/// Half-typed numbers are accepted: `"."`, `"1."`, `"-"` and `"-.5"` parse
/// as `0`, `1`, `0` and `-0.5`.
pub fn parse_operand(text: &str) -> Result<BigDecimal, ArithmeticError> {
    let trimmed = text.trim();
    let (negative, magnitude) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let magnitude = magnitude.strip_suffix('.').unwrap_or(magnitude);
    if magnitude.is_empty() {
        return Ok(BigDecimal::from(0));
    }

    // Only plain keypad numbers; no exponents, signs or separators inside.
    if !magnitude.chars().all(|c| c.is_ascii_digit() || c == '.')
        || magnitude.matches('.').count() > 1
    {
        return Err(ArithmeticError::InvalidOperand(text.to_string()));
    }

    let canonical = match (negative, magnitude.starts_with('.')) {
        (true, true) => format!("-0{}", magnitude),
        (true, false) => format!("-{}", magnitude),
        (false, true) => format!("0{}", magnitude),
        (false, false) => magnitude.to_string(),
    };

    BigDecimal::from_str(&canonical).map_err(|_| ArithmeticError::InvalidOperand(text.to_string()))
}

/// Clamp a requested division precision to the supported range.
pub fn clamp_precision(precision: u64) -> u64 {
    precision.clamp(1, MAX_DIVISION_PRECISION)
}

/// Divide by a non-zero `rhs`: exactly if the quotient terminates, otherwise
/// rounded to `precision` significant digits.
fn divide(lhs: &BigDecimal, rhs: &BigDecimal, precision: u64) -> BigDecimal {
    match exact_quotient(lhs, rhs) {
        Some(quotient) => quotient,
        None => round_significant(lhs.clone() / rhs.clone(), clamp_precision(precision)),
    }
}

/// The exact quotient of `lhs / rhs`, if it has a finite decimal expansion.
///
/// With `lhs = a * 10^-sa` and `rhs = b * 10^-sb`, write `b = 2^x * 5^y * m`.
/// The quotient terminates exactly when `m` divides `a`; then
/// `a * 10^k / b` is an integer for `k = max(x, y)`.
fn exact_quotient(lhs: &BigDecimal, rhs: &BigDecimal) -> Option<BigDecimal> {
    let zero = BigDecimal::from(0);
    let negative = (*lhs < zero) != (*rhs < zero);

    let (a, lhs_scale) = lhs.as_bigint_and_exponent();
    let (b, rhs_scale) = rhs.as_bigint_and_exponent();
    let dividend = BigDecimal::new(a, 0).abs();
    let divisor = BigDecimal::new(b, 0).abs();

    let (rest, twos) = strip_factor(divisor.clone(), 2, BigDecimal::new(5.into(), 1));
    let (rest, fives) = strip_factor(rest, 5, BigDecimal::new(2.into(), 1));
    if dividend.clone() % rest != zero {
        return None;
    }

    let k = twos.max(fives);
    let scaled = dividend * BigDecimal::new(1.into(), -k);
    let (digits, scale) = long_divide(&scaled, &divisor)
        .with_scale(0)
        .into_bigint_and_exponent();

    let quotient = BigDecimal::new(digits, scale + k + lhs_scale - rhs_scale);
    Some(if negative { -quotient } else { quotient })
}

/// Remove every factor `factor` from a positive integer, multiplying by its
/// `reciprocal` so no rounding can happen. Returns the rest and the count.
fn strip_factor(mut value: BigDecimal, factor: u8, reciprocal: BigDecimal) -> (BigDecimal, i64) {
    let zero = BigDecimal::from(0);
    let factor = BigDecimal::from(factor);
    let mut count = 0;

    while value.clone() % factor.clone() == zero {
        value = (value * reciprocal.clone()).normalized();
        count += 1;
    }

    (value, count)
}

/// Schoolbook division of non-negative integers, one decimal digit at a time.
/// The caller guarantees `divisor` divides `dividend`.
fn long_divide(dividend: &BigDecimal, divisor: &BigDecimal) -> BigDecimal {
    let ten = BigDecimal::from(10);
    let mut quotient = BigDecimal::from(0);
    let mut remainder = BigDecimal::from(0);

    for digit in format_plain(dividend).bytes() {
        remainder = remainder * ten.clone() + BigDecimal::from(digit - b'0');

        let mut next = 0u8;
        while remainder >= *divisor {
            remainder = remainder - divisor.clone();
            next += 1;
        }
        quotient = quotient * ten.clone() + BigDecimal::from(next);
    }

    quotient
}

/// Round to at most `precision` significant digits.
fn round_significant(value: BigDecimal, precision: u64) -> BigDecimal {
    let (_, scale) = value.as_bigint_and_exponent();
    let digits = i64::try_from(value.digits()).unwrap_or(i64::MAX);
    let precision = i64::try_from(precision).unwrap_or(i64::MAX);
    let target_scale = precision.saturating_sub(digits).saturating_add(scale);

    if scale <= target_scale {
        value
    } else {
        value.with_scale_round(target_scale, RoundingMode::HalfEven)
    }
}

/// Format in plain notation without trailing fractional zeros.
pub fn format_plain(value: &BigDecimal) -> String {
    let (unscaled, scale) = value.normalized().as_bigint_and_exponent();
    let raw = unscaled.to_string();
    let (negative, magnitude) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.as_str()),
    };

    if magnitude.chars().all(|c| c == '0') {
        return "0".to_string();
    }

    let body = if scale <= 0 {
        format!("{}{}", magnitude, "0".repeat(scale.unsigned_abs() as usize))
    } else {
        let scale = scale as usize;
        if magnitude.len() > scale {
            let (int_part, frac_part) = magnitude.split_at(magnitude.len() - scale);
            format!("{}.{}", int_part, frac_part)
        } else {
            format!("0.{}{}", "0".repeat(scale - magnitude.len()), magnitude)
        }
    };

    if negative { format!("-{}", body) } else { body }
}
