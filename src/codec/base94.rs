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

//! Base-94 digit strings over the body range
//!
//! Digits are big-endian; digit `d` is stored as byte `d + 33`. Zero is the
//! single digit `!`, and no other value carries leading zero digits.

use num_bigint::{BigInt, BigUint, Sign};

use super::{BODY_FIRST, BODY_RADIX, CodecError, CodecResult, is_body_byte};

/// Encode a non-negative integer as base-94 body bytes
pub fn encode_base94(value: &BigInt) -> CodecResult<Vec<u8>> {
    if value.sign() == Sign::Minus {
        return Err(CodecError::NegativeInteger);
    }
    Ok(encode_base94_unsigned(value.magnitude()))
}

/// Encode an unsigned integer as base-94 body bytes
pub fn encode_base94_unsigned(value: &BigUint) -> Vec<u8> {
    // to_radix_be yields [0] for zero, which is exactly the single `!` digit
    let mut digits = value.to_radix_be(BODY_RADIX);
    for digit in digits.iter_mut() {
        *digit += BODY_FIRST;
    }
    digits
}

/// Encode a `u64` (typically a variable id) as base-94 body bytes
pub fn encode_base94_u64(value: u64) -> Vec<u8> {
    encode_base94_unsigned(&BigUint::from(value))
}

/// Decode base-94 body bytes into a non-negative integer
///
/// An empty payload decodes to zero.
pub fn decode_base94(bytes: &[u8]) -> CodecResult<BigInt> {
    let digits = to_digits(bytes)?;
    if digits.is_empty() {
        return Ok(BigInt::ZERO);
    }

    let magnitude = BigUint::from_radix_be(&digits, BODY_RADIX).ok_or(CodecError::InvalidDigit {
        byte: bytes[0],
        position: 0,
    })?;
    Ok(BigInt::from(magnitude))
}

/// Decode base-94 body bytes into a `u64`, failing on overflow
///
/// Used for variable ids, which are names rather than numbers and never need
/// more than a handful of digits.
pub fn decode_base94_u64(bytes: &[u8]) -> CodecResult<u64> {
    let mut value: u64 = 0;
    for (position, &byte) in bytes.iter().enumerate() {
        if !is_body_byte(byte) {
            return Err(CodecError::InvalidDigit { byte, position });
        }
        value = value
            .checked_mul(u64::from(BODY_RADIX))
            .and_then(|v| v.checked_add(u64::from(byte - BODY_FIRST)))
            .ok_or(CodecError::Overflow {
                digits: bytes.len(),
            })?;
    }
    Ok(value)
}

fn to_digits(bytes: &[u8]) -> CodecResult<Vec<u8>> {
    bytes
        .iter()
        .enumerate()
        .map(|(position, &byte)| {
            if is_body_byte(byte) {
                Ok(byte - BODY_FIRST)
            } else {
                Err(CodecError::InvalidDigit { byte, position })
            }
        })
        .collect()
}
