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

//! Mnemonic assembler for the token format
//!
//! Writing programs directly in tokens is tedious, so the assembler accepts a
//! few shorthands and passes every other word through unchanged:
//!
//! | Word | Emitted tokens |
//! |---|---|
//! | decimal digits, e.g. `1337` | integer token, e.g. `I/6` |
//! | double-quoted text, e.g. `"hi"` | string token in the body alphabet |
//! | `Y` | the fixed-point combinator `L" B$ L# B$ v" B$ v# v# L# B$ v" B$ v# v#` |
//!
//! Words are separated by whitespace, so string shorthands cannot contain
//! spaces.

use num_bigint::BigUint;
use thiserror::Error;

use crate::codec::{self, CodecError};

/// Expansion of the `Y` mnemonic
pub const Y_COMBINATOR: &str = r#"L" B$ L# B$ v" B$ v# v# L# B$ v" B$ v# v#"#;

/// Result type for assembler operations
pub type AssembleResult<T> = Result<T, AssembleError>;

/// Errors raised while assembling mnemonics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// Quoted word without a closing quote
    #[error("String literal {word} does not end with '\"'")]
    UnterminatedString {
        /// Offending word
        word: String,
    },

    /// String literal with a character outside the body alphabet
    #[error("Cannot encode string literal {word}: {source}")]
    Encoding {
        /// Offending word
        word: String,
        /// Underlying codec error
        #[source]
        source: CodecError,
    },
}

fn assemble_word(word: &str) -> AssembleResult<String> {
    if word.bytes().all(|b| b.is_ascii_digit()) {
        // Digits always parse
        let value = word.parse::<BigUint>().unwrap_or_default();
        return Ok(body_token('I', &codec::encode_base94_unsigned(&value)));
    }

    if let Some(quoted) = word.strip_prefix('"') {
        let Some((text, _)) = quoted.rsplit_once('"') else {
            return Err(AssembleError::UnterminatedString {
                word: word.to_string(),
            });
        };
        let body = codec::encode_body(text).map_err(|source| AssembleError::Encoding {
            word: word.to_string(),
            source,
        })?;
        return Ok(body_token('S', &body));
    }

    if word == "Y" {
        return Ok(Y_COMBINATOR.to_string());
    }
    Ok(word.to_string())
}

fn body_token(indicator: char, payload: &[u8]) -> String {
    let mut token = String::with_capacity(payload.len() + 1);
    token.push(indicator);
    token.extend(payload.iter().map(|&b| char::from(b)));
    token
}

/// Assemble a whitespace-separated mnemonic program into source text
pub fn assemble(asm: &str) -> AssembleResult<String> {
    let words = asm
        .split_ascii_whitespace()
        .map(assemble_word)
        .collect::<AssembleResult<Vec<_>>>()?;
    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literals() {
        assert_eq!(assemble("1337").unwrap(), "I/6");
        assert_eq!(assemble("0").unwrap(), "I!");
        assert_eq!(assemble(r#""Hello""#).unwrap(), "SB%,,/");
        assert_eq!(assemble(r#""""#).unwrap(), "S");
    }

    #[test]
    fn test_pass_through_and_y() {
        assert_eq!(
            assemble("B$ Y L\" v\"").unwrap(),
            format!("B$ {Y_COMBINATOR} L\" v\"")
        );
        assert_eq!(assemble("  U-\n 3 ").unwrap(), "U- I$");
    }

    #[test]
    fn test_big_integer() {
        // 94^10
        let source = assemble("53861511409489970176").unwrap();
        assert_eq!(source, "I\"!!!!!!!!!!");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            assemble("\"abc").unwrap_err(),
            AssembleError::UnterminatedString {
                word: "\"abc".to_string()
            }
        );
        assert!(matches!(
            assemble("\"a{b\""),
            Err(AssembleError::Encoding { .. })
        ));
    }
}
