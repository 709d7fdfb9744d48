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

//! Body alphabet substitution
//!
//! Body byte `b` stands for `HUMAN_ALPHABET[b - 33]`.

use once_cell::sync::Lazy;

use super::{BODY_FIRST, CodecError, CodecResult, is_body_byte};

/// Human-readable characters in body order
pub const HUMAN_ALPHABET: &[u8; 94] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`|~ \n";

/// Inverse lookup from ASCII code to body byte, 0 where unmapped
static BODY_OF_HUMAN: Lazy<[u8; 128]> = Lazy::new(|| {
    let mut table = [0u8; 128];
    for (index, &human) in HUMAN_ALPHABET.iter().enumerate() {
        table[human as usize] = BODY_FIRST + index as u8;
    }
    table
});

/// Map one body byte to its human character
#[inline]
pub fn decode_body_byte(byte: u8) -> Option<char> {
    if is_body_byte(byte) {
        Some(HUMAN_ALPHABET[(byte - BODY_FIRST) as usize] as char)
    } else {
        None
    }
}

/// Map one human character to its body byte
#[inline]
pub fn encode_body_char(character: char) -> Option<u8> {
    if character.is_ascii() {
        match BODY_OF_HUMAN[character as usize] {
            0 => None,
            byte => Some(byte),
        }
    } else {
        None
    }
}

/// Decode body bytes into human text
pub fn decode_body(bytes: &[u8]) -> CodecResult<String> {
    bytes
        .iter()
        .enumerate()
        .map(|(position, &byte)| {
            decode_body_byte(byte).ok_or(CodecError::InvalidDigit { byte, position })
        })
        .collect()
}

/// Encode human text into body bytes
pub fn encode_body(text: &str) -> CodecResult<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, character)| {
            encode_body_char(character).ok_or(CodecError::UnencodableCharacter {
                character,
                position,
            })
        })
        .collect()
}
