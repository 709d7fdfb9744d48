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

// Error types for expression evaluation

use std::fmt;
use thiserror::Error;

use crate::ast::VariableId;
use crate::model::Value;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that abort evaluation
///
/// Every error is fatal for the whole program: the evaluator does not
/// recover or return partial results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// Operator applied to a value of the wrong variant
    #[error("Type error in '{operator}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Operator name
        operator: String,
        /// Expected variant
        expected: &'static str,
        /// Variant actually found
        actual: &'static str,
    },

    /// Division or modulo with a zero divisor
    #[error("Division by zero in '{operator}'")]
    DivisionByZero {
        /// Operator name
        operator: String,
    },

    /// Operand of the right variant but outside the operator's domain
    #[error("Invalid argument to '{operator}': {message}")]
    InvalidArgument {
        /// Operator name
        operator: String,
        /// Error message
        message: String,
    },

    /// A lazily bound value demanded itself while being computed
    #[error("Variable v{variable} depends on its own value")]
    CyclicThunk {
        /// Variable whose binding is being forced
        variable: VariableId,
    },
}

impl EvaluationError {
    /// Create a type mismatch naming the offending operand's variant
    pub fn type_mismatch(
        operator: impl fmt::Display,
        expected: &'static str,
        actual: &Value,
    ) -> Self {
        EvaluationError::TypeMismatch {
            operator: operator.to_string(),
            expected,
            actual: actual.type_name(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(operator: impl fmt::Display, message: impl Into<String>) -> Self {
        EvaluationError::InvalidArgument {
            operator: operator.to_string(),
            message: message.into(),
        }
    }
}
