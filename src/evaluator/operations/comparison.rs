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

//! Comparison operators

use num_bigint::BigInt;

use crate::ast::BinaryOperator;
use crate::evaluator::error::{EvaluationError, EvaluationResult};
use crate::model::Value;

/// Integer less-than
pub fn less_than(left: &BigInt, right: &BigInt) -> bool {
    left < right
}

/// Integer greater-than
pub fn greater_than(left: &BigInt, right: &BigInt) -> bool {
    left > right
}

/// Equality of two values of the same variant
///
/// Booleans, integers and strings compare structurally. Operands of
/// different variants, closures and `Undefined` are type errors.
pub fn equal(left: &Value, right: &Value) -> EvaluationResult<bool> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        (Value::Integer(a), Value::Integer(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Boolean(_) | Value::Integer(_) | Value::String(_), other) => Err(
            EvaluationError::type_mismatch(BinaryOperator::Equal, left.type_name(), other),
        ),
        (other, _) => Err(EvaluationError::type_mismatch(
            BinaryOperator::Equal,
            "Boolean, Integer or String",
            other,
        )),
    }
}
