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

//! Error types for the lambda engine
//!
//! This module defines the crate-level error that wraps the errors of each
//! pipeline stage.

use thiserror::Error;

use crate::assembler::AssembleError;
use crate::codec::CodecError;
use crate::evaluator::EvaluationError;
use crate::parser::ParseError;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, LambdaError>;

/// Error raised anywhere between source text and final value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LambdaError {
    /// Source text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation aborted
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Text could not be converted to or from the body alphabet
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Mnemonic program could not be assembled
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

impl LambdaError {
    /// Check if this is an evaluation-time type error
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            LambdaError::Evaluation(EvaluationError::TypeMismatch { .. })
        )
    }
}
