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

//! Conversions between integers and strings
//!
//! Both directions reinterpret the body bytes of a string as base-94 digits,
//! so `U$` and `U#` are inverse for non-negative integers.

use num_bigint::BigInt;

use crate::ast::UnaryOperator;
use crate::codec;
use crate::evaluator::error::{EvaluationError, EvaluationResult};
use crate::model::BodyString;

/// Read a string's body bytes as base-94 digits
pub fn string_to_int(text: &BodyString) -> EvaluationResult<BigInt> {
    codec::decode_base94(text.as_bytes())
        .map_err(|e| EvaluationError::invalid_argument(UnaryOperator::StringToInt, e.to_string()))
}

/// Base-94 digits of a non-negative integer as a string
pub fn int_to_string(value: &BigInt) -> EvaluationResult<BodyString> {
    codec::encode_base94(value)
        .map(BodyString::from_body)
        .map_err(|e| EvaluationError::invalid_argument(UnaryOperator::IntToString, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_int() {
        let text = BodyString::from_human("test").unwrap();
        assert_eq!(text.as_bytes(), b"4%34");
        assert_eq!(string_to_int(&text), Ok(BigInt::from(15818151)));
    }

    #[test]
    fn test_int_to_string() {
        let text = int_to_string(&BigInt::from(15818151)).unwrap();
        assert_eq!(text.to_human().unwrap(), "test");
        assert_eq!(int_to_string(&BigInt::from(0)).unwrap().as_bytes(), b"!");
    }

    #[test]
    fn test_negative_integer_has_no_string() {
        assert!(matches!(
            int_to_string(&BigInt::from(-1)),
            Err(EvaluationError::InvalidArgument { .. })
        ));
    }
}
