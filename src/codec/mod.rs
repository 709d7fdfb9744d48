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

//! Codecs for the printable-ASCII "body" range used by the token format
//!
//! Two independent mappings live here:
//! - the body alphabet, a fixed 94-entry substitution between body bytes and
//!   human-readable text, used for string literal payloads
//! - base-94 digits, a bijection between non-negative integers and digit
//!   strings over the same byte range, used for integer and variable payloads

#![warn(missing_docs)]

mod base94;
mod body;

pub use base94::{
    decode_base94, decode_base94_u64, encode_base94, encode_base94_u64, encode_base94_unsigned,
};
pub use body::{HUMAN_ALPHABET, decode_body, decode_body_byte, encode_body, encode_body_char};

use thiserror::Error;

/// First byte of the body range (`!`)
pub const BODY_FIRST: u8 = b'!';

/// Last byte of the body range (`~`)
pub const BODY_LAST: u8 = b'~';

/// Number of symbols in the body range
pub const BODY_RADIX: u32 = 94;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while converting between body bytes and integers or text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A payload byte lies outside the printable body range
    #[error("Invalid body byte 0x{byte:02x} at position {position}")]
    InvalidDigit {
        /// The offending byte
        byte: u8,
        /// Offset of the byte within the payload
        position: usize,
    },

    /// A character has no entry in the human alphabet
    #[error("Character {character:?} at position {position} cannot be body-encoded")]
    UnencodableCharacter {
        /// The offending character
        character: char,
        /// Offset of the character within the text
        position: usize,
    },

    /// Base-94 only represents non-negative integers
    #[error("Cannot base-94 encode a negative integer")]
    NegativeInteger,

    /// A decoded value does not fit the requested width
    #[error("Base-94 payload of {digits} digits overflows 64 bits")]
    Overflow {
        /// Number of digits in the payload
        digits: usize,
    },
}

/// Check whether a byte belongs to the body range
#[inline(always)]
pub fn is_body_byte(byte: u8) -> bool {
    (BODY_FIRST..=BODY_LAST).contains(&byte)
}
