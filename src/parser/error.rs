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

//! Parser error types

use thiserror::Error;

use super::span::Spanned;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while turning source text into a tree
///
/// The token format is permissive: by default malformed tokens degrade into
/// `Undefined` nodes and missing operands are filled with `Undefined`. Errors
/// are only produced when strict token checking is enabled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Token with an unknown indicator or an invalid payload
    #[error("Malformed token '{token}' at position {position}: {reason}")]
    MalformedToken {
        /// Raw token text
        token: String,
        /// Byte offset of the token in the source
        position: usize,
        /// What is wrong with the token
        reason: String,
    },
}

impl ParseError {
    /// Malformed token error located at the token's span
    pub fn malformed(token: &Spanned<&str>, reason: impl Into<String>) -> Self {
        ParseError::MalformedToken {
            token: token.value.to_string(),
            position: token.start,
            reason: reason.into(),
        }
    }
}
