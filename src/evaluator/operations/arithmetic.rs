// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integer arithmetic
//!
//! Division and remainder truncate toward zero, and the sign of both results
//! is negative exactly when one operand is negative.

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

use crate::evaluator::error::{EvaluationError, EvaluationResult};

/// Integer negation
pub fn negate(value: &BigInt) -> BigInt {
    -value
}

/// Integer addition
pub fn add(left: &BigInt, right: &BigInt) -> BigInt {
    left + right
}

/// Integer subtraction
pub fn subtract(left: &BigInt, right: &BigInt) -> BigInt {
    left - right
}

/// Integer multiplication
pub fn multiply(left: &BigInt, right: &BigInt) -> BigInt {
    left * right
}

/// Quotient truncated toward zero
pub fn divide(left: &BigInt, right: &BigInt) -> EvaluationResult<BigInt> {
    if right.is_zero() {
        return Err(EvaluationError::DivisionByZero {
            operator: "/".to_string(),
        });
    }
    // BigInt division already truncates
    Ok(left / right)
}

/// Remainder of the magnitudes, negated when the operand signs differ
pub fn modulo(left: &BigInt, right: &BigInt) -> EvaluationResult<BigInt> {
    if right.is_zero() {
        return Err(EvaluationError::DivisionByZero {
            operator: "%".to_string(),
        });
    }
    let remainder = left.abs() % right.abs();
    let negative = (left.sign() == Sign::Minus) != (right.sign() == Sign::Minus);
    Ok(if negative { -remainder } else { remainder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn big(value: i64) -> BigInt {
        BigInt::from(value)
    }

    #[rstest]
    #[case(-10, 3, -3)]
    #[case(10, -3, -3)]
    #[case(-10, -3, 3)]
    #[case(10, 3, 3)]
    #[case(0, 5, 0)]
    fn test_divide_truncates(#[case] left: i64, #[case] right: i64, #[case] expected: i64) {
        assert_eq!(divide(&big(left), &big(right)), Ok(big(expected)));
    }

    #[rstest]
    #[case(-10, 3, -1)]
    #[case(10, 3, 1)]
    #[case(10, -3, -1)]
    #[case(-10, -3, 1)]
    #[case(9, 3, 0)]
    fn test_modulo_sign(#[case] left: i64, #[case] right: i64, #[case] expected: i64) {
        assert_eq!(modulo(&big(left), &big(right)), Ok(big(expected)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            divide(&big(1), &big(0)),
            Err(EvaluationError::DivisionByZero {
                operator: "/".to_string()
            })
        );
        assert!(modulo(&big(1), &big(0)).is_err());
    }

    #[test]
    fn test_beyond_machine_integers() {
        let huge = BigInt::from(u64::MAX) * BigInt::from(u64::MAX);
        assert_eq!(
            multiply(&big(i64::MAX), &big(i64::MAX)).to_string(),
            "85070591730234615847396907784232501249"
        );
        assert_eq!(subtract(&add(&huge, &big(1)), &huge), big(1));
        assert_eq!(negate(&big(3)), big(-3));
    }
}
