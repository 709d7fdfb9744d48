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

//! Operator semantics
//!
//! Operands arrive fully forced. Every operator checks the variants of its
//! operands and reports a [`EvaluationError::TypeMismatch`] naming the
//! offending variant; `Undefined` never satisfies a check.

mod arithmetic;
mod comparison;
mod conversion;
mod logical;
mod string;

pub use arithmetic::*;
pub use comparison::*;
pub use conversion::*;
pub use logical::*;
pub use string::*;

use num_bigint::BigInt;

use super::error::{EvaluationError, EvaluationResult};
use crate::ast::{BinaryOperator, UnaryOperator};
use crate::model::{BodyString, Value};

/// Apply a unary operator to a forced operand
pub fn apply_unary(operator: UnaryOperator, operand: &Value) -> EvaluationResult<Value> {
    match operator {
        UnaryOperator::Negate => Ok(Value::Integer(negate(expect_integer(operator, operand)?))),
        UnaryOperator::Not => Ok(Value::Boolean(not(expect_boolean(operator, operand)?))),
        UnaryOperator::StringToInt => {
            string_to_int(expect_string(operator, operand)?).map(Value::Integer)
        }
        UnaryOperator::IntToString => {
            int_to_string(expect_integer(operator, operand)?).map(Value::String)
        }
    }
}

/// Apply a strict binary operator to two forced operands
///
/// Application is not a strict operator and is handled by the evaluator.
pub fn apply_binary(operator: BinaryOperator, left: &Value, right: &Value) -> EvaluationResult<Value> {
    use BinaryOperator::*;

    let integers = || {
        Ok::<_, EvaluationError>((
            expect_integer(operator, left)?,
            expect_integer(operator, right)?,
        ))
    };
    let booleans = || {
        Ok::<_, EvaluationError>((
            expect_boolean(operator, left)?,
            expect_boolean(operator, right)?,
        ))
    };

    match operator {
        Add => integers().map(|(a, b)| Value::Integer(add(a, b))),
        Subtract => integers().map(|(a, b)| Value::Integer(subtract(a, b))),
        Multiply => integers().map(|(a, b)| Value::Integer(multiply(a, b))),
        Divide => integers().and_then(|(a, b)| divide(a, b)).map(Value::Integer),
        Modulo => integers().and_then(|(a, b)| modulo(a, b)).map(Value::Integer),
        LessThan => integers().map(|(a, b)| Value::Boolean(less_than(a, b))),
        GreaterThan => integers().map(|(a, b)| Value::Boolean(greater_than(a, b))),
        Equal => equal(left, right).map(Value::Boolean),
        Or => booleans().map(|(a, b)| Value::Boolean(or(a, b))),
        And => booleans().map(|(a, b)| Value::Boolean(and(a, b))),
        Concat => Ok(Value::String(concat(
            expect_string(operator, left)?,
            expect_string(operator, right)?,
        ))),
        Take => take(
            expect_integer(operator, left)?,
            expect_string(operator, right)?,
        )
        .map(Value::String),
        Drop => drop_prefix(
            expect_integer(operator, left)?,
            expect_string(operator, right)?,
        )
        .map(Value::String),
        Apply => Err(EvaluationError::invalid_argument(
            operator,
            "application is evaluated lazily by the evaluator",
        )),
    }
}

pub(crate) fn expect_integer(
    operator: impl std::fmt::Display,
    value: &Value,
) -> EvaluationResult<&BigInt> {
    value
        .as_integer()
        .ok_or_else(|| EvaluationError::type_mismatch(operator, "Integer", value))
}

pub(crate) fn expect_boolean(
    operator: impl std::fmt::Display,
    value: &Value,
) -> EvaluationResult<bool> {
    value
        .as_boolean()
        .ok_or_else(|| EvaluationError::type_mismatch(operator, "Boolean", value))
}

pub(crate) fn expect_string(
    operator: impl std::fmt::Display,
    value: &Value,
) -> EvaluationResult<&BodyString> {
    value
        .as_string()
        .ok_or_else(|| EvaluationError::type_mismatch(operator, "String", value))
}
