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

//! Tokenizer for the indicator-prefixed token format
//!
//! Source text is a sequence of tokens separated by runs of space, tab, CR or
//! LF. The first byte of a token (the indicator) selects its kind and the
//! rest is the payload:
//!
//! | Indicator | Token | Payload |
//! |---|---|---|
//! | `T` / `F` | boolean | none |
//! | `I` | integer | base-94 digits |
//! | `S` | string | body-alphabet bytes |
//! | `U` | unary operator | one of `- ! # $` |
//! | `B` | binary operator | one of `+ - * / % < > = \| & . T D $` |
//! | `?` | conditional | none |
//! | `L` | lambda | base-94 variable id |
//! | `v` | variable | base-94 variable id |

use num_bigint::BigInt;

use super::error::{ParseError, ParseResult};
use super::span::Spanned;
use crate::ast::{BinaryOperator, UnaryOperator, VariableId};
use crate::codec;

/// Token with zero-copy payload slices
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    /// Boolean literal (`T`, `F`)
    Boolean(bool),
    /// Integer literal, decoded eagerly
    Integer(BigInt),
    /// String literal as raw body bytes, decoded on demand
    String(&'input [u8]),
    /// Unary operator, one operand follows
    Unary(UnaryOperator),
    /// Binary operator, two operands follow
    Binary(BinaryOperator),
    /// Conditional, three operands follow
    If,
    /// Lambda binding a variable, one operand (the body) follows
    Lambda(VariableId),
    /// Variable reference
    Variable(VariableId),
    /// Unrecognized or malformed token, kept verbatim
    Undefined(&'input str),
}

impl<'input> Token<'input> {
    /// Number of operand subtrees that follow this token
    #[inline]
    pub fn arity(&self) -> usize {
        match self {
            Token::Unary(_) | Token::Lambda(_) => 1,
            Token::Binary(_) => 2,
            Token::If => 3,
            _ => 0,
        }
    }

    /// Classify a single whitespace-free token
    ///
    /// Returns the reason on failure so the caller can decide between
    /// degrading to [`Token::Undefined`] and raising an error.
    pub fn classify(text: &'input str) -> Result<Token<'input>, String> {
        let bytes = text.as_bytes();
        let Some((&indicator, payload)) = bytes.split_first() else {
            return Err("empty token".to_string());
        };

        match indicator {
            b'T' | b'F' | b'?' if !payload.is_empty() => {
                Err(format!("'{}' takes no payload", indicator as char))
            }
            b'T' => Ok(Token::Boolean(true)),
            b'F' => Ok(Token::Boolean(false)),
            b'?' => Ok(Token::If),
            b'I' => codec::decode_base94(payload)
                .map(Token::Integer)
                .map_err(|e| e.to_string()),
            b'S' => match payload.iter().position(|&b| !codec::is_body_byte(b)) {
                None => Ok(Token::String(payload)),
                Some(position) => Err(format!(
                    "string byte 0x{:02x} at offset {position} is outside the body range",
                    payload[position]
                )),
            },
            b'U' => match payload {
                [byte] => UnaryOperator::from_byte(*byte)
                    .map(Token::Unary)
                    .ok_or_else(|| format!("unknown unary operator '{}'", *byte as char)),
                _ => Err("unary operator payload must be exactly one byte".to_string()),
            },
            b'B' => match payload {
                [byte] => BinaryOperator::from_byte(*byte)
                    .map(Token::Binary)
                    .ok_or_else(|| format!("unknown binary operator '{}'", *byte as char)),
                _ => Err("binary operator payload must be exactly one byte".to_string()),
            },
            b'L' => codec::decode_base94_u64(payload)
                .map(|id| Token::Lambda(VariableId(id)))
                .map_err(|e| e.to_string()),
            b'v' => codec::decode_base94_u64(payload)
                .map(|id| Token::Variable(VariableId(id)))
                .map_err(|e| e.to_string()),
            _ => Err(format!("unknown indicator '{}'", text.chars().next().unwrap_or('?'))),
        }
    }
}

/// Whitespace-splitting tokenizer
#[derive(Clone)]
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    pos: usize,
    end: usize,
    /// Raise errors for malformed tokens instead of yielding `Undefined`
    strict: bool,
}

impl<'input> Tokenizer<'input> {
    /// Create a lenient tokenizer
    #[inline]
    pub fn new(input: &'input str) -> Self {
        Self::with_strict(input, false)
    }

    /// Create a tokenizer with explicit malformed-token handling
    #[inline]
    pub fn with_strict(input: &'input str, strict: bool) -> Self {
        let bytes = input.as_bytes();
        Self {
            input,
            bytes,
            pos: 0,
            end: bytes.len(),
            strict,
        }
    }

    #[inline(always)]
    fn is_separator(byte: u8) -> bool {
        matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
    }

    #[inline(always)]
    fn skip_whitespace(&mut self) {
        while self.pos < self.end && Self::is_separator(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.skip_whitespace();
        if self.pos >= self.end {
            return Ok(None);
        }

        let start = self.pos;
        while self.pos < self.end && !Self::is_separator(self.bytes[self.pos]) {
            self.pos += 1;
        }
        // Separators are ASCII, so both ends fall on char boundaries
        let raw = Spanned::new(&self.input[start..self.pos], start, self.pos);

        let token = match Token::classify(raw.value) {
            Ok(token) => token,
            Err(reason) if self.strict => return Err(ParseError::malformed(&raw, reason)),
            Err(reason) => {
                log::warn!(
                    "Treating token '{}' at position {} as undefined: {reason}",
                    raw.value,
                    raw.start
                );
                Token::Undefined(raw.value)
            }
        };
        Ok(Some(Spanned::new(token, raw.start, raw.end)))
    }

    /// Tokenize the remaining input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn test_tokenizer_basic() {
        let mut tokenizer = Tokenizer::new("B+ I# I$");

        let first = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(first.value, Token::Binary(BinaryOperator::Add));
        assert_eq!((first.start, first.end), (0, 2));

        let second = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(second.value, Token::Integer(BigInt::from(2)));

        let third = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(third.value, Token::Integer(BigInt::from(3)));

        assert!(tokenizer.next_token().unwrap().is_none());
    }

    #[test]
    fn test_all_indicators() {
        assert_eq!(
            kinds("T F I/6 SB%,,/}Q/2,$_ U# BT ? L# v#"),
            vec![
                Token::Boolean(true),
                Token::Boolean(false),
                Token::Integer(BigInt::from(1337)),
                Token::String(b"B%,,/}Q/2,$_"),
                Token::Unary(UnaryOperator::StringToInt),
                Token::Binary(BinaryOperator::Take),
                Token::If,
                Token::Lambda(VariableId(2)),
                Token::Variable(VariableId(2)),
            ]
        );
    }

    #[test]
    fn test_whitespace_runs() {
        let tokens = kinds("  U-\t\r\n I$ \n");
        assert_eq!(
            tokens,
            vec![
                Token::Unary(UnaryOperator::Negate),
                Token::Integer(BigInt::from(3))
            ]
        );
        assert!(kinds(" \t ").is_empty());
    }

    #[test]
    fn test_malformed_tokens_degrade() {
        assert_eq!(
            kinds("X U+ B$$ Tx I\u{7f}"),
            vec![
                Token::Undefined("X"),
                Token::Undefined("U+"),
                Token::Undefined("B$$"),
                Token::Undefined("Tx"),
                Token::Undefined("I\u{7f}"),
            ]
        );
    }

    #[test]
    fn test_strict_mode_reports_position() {
        let mut tokenizer = Tokenizer::with_strict("I! Uq", true);
        assert!(tokenizer.next_token().unwrap().is_some());
        match tokenizer.next_token() {
            Err(ParseError::MalformedToken {
                token, position, ..
            }) => {
                assert_eq!(token, "Uq");
                assert_eq!(position, 3);
            }
            other => panic!("expected malformed token, got {other:?}"),
        }
    }

    #[test]
    fn test_arity() {
        assert_eq!(Token::If.arity(), 3);
        assert_eq!(Token::Binary(BinaryOperator::Apply).arity(), 2);
        assert_eq!(Token::Lambda(VariableId(0)).arity(), 1);
        assert_eq!(Token::Boolean(true).arity(), 0);
        assert_eq!(Token::Undefined("x").arity(), 0);
    }
}
