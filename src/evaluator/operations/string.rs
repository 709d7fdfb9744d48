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

//! String operators
//!
//! Strings stay in body form; one body byte is one character.

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::ast::BinaryOperator;
use crate::evaluator::error::{EvaluationError, EvaluationResult};
use crate::model::BodyString;

/// String concatenation
pub fn concat(left: &BodyString, right: &BodyString) -> BodyString {
    left.concat(right)
}

/// First `count` characters of `text`
pub fn take(count: &BigInt, text: &BodyString) -> EvaluationResult<BodyString> {
    character_count(BinaryOperator::Take, count).map(|n| text.take(n))
}

/// `text` without its first `count` characters
pub fn drop_prefix(count: &BigInt, text: &BodyString) -> EvaluationResult<BodyString> {
    character_count(BinaryOperator::Drop, count).map(|n| text.drop_prefix(n))
}

// Counts past the end of any string clamp to usize::MAX
fn character_count(operator: BinaryOperator, count: &BigInt) -> EvaluationResult<usize> {
    if count.sign() == Sign::Minus {
        return Err(EvaluationError::invalid_argument(
            operator,
            format!("character count must not be negative, got {count}"),
        ));
    }
    Ok(count.to_usize().unwrap_or(usize::MAX))
}
