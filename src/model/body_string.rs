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

//! Opaque string payloads in the body alphabet

use std::fmt;
use std::rc::Rc;

use crate::codec::{self, CodecResult};

/// String value kept in its raw body-alphabet form
///
/// Strings are decoded into human text only at the boundary (display,
/// [`BodyString::to_human`]). Slicing and concatenation work on the body bytes,
/// which map one-to-one onto human characters.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BodyString(Rc<[u8]>);

impl BodyString {
    /// Wrap raw body bytes
    ///
    /// Bytes are not validated here; payloads produced by the tokenizer are
    /// always inside the body range.
    pub fn from_body(bytes: impl Into<Rc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Body-encode human text
    pub fn from_human(text: &str) -> CodecResult<Self> {
        codec::encode_body(text).map(Self::from_body)
    }

    /// Raw body bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into human text
    pub fn to_human(&self) -> CodecResult<String> {
        codec::decode_body(&self.0)
    }

    /// First `count` characters, clamped to the string length
    pub fn take(&self, count: usize) -> Self {
        if count >= self.len() {
            return self.clone();
        }
        Self::from_body(&self.0[..count])
    }

    /// Everything after the first `count` characters, clamped to the string length
    pub fn drop_prefix(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }
        Self::from_body(&self.0[count.min(self.len())..])
    }

    /// Concatenate two strings
    pub fn concat(&self, other: &BodyString) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut bytes = Vec::with_capacity(self.len() + other.len());
        bytes.extend_from_slice(&self.0);
        bytes.extend_from_slice(&other.0);
        Self::from_body(bytes)
    }
}

impl fmt::Display for BodyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0.iter() {
            match codec::decode_body_byte(byte) {
                Some(character) => write!(f, "{character}")?,
                None => write!(f, "\\x{byte:02x}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BodyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human(text: &str) -> BodyString {
        BodyString::from_human(text).unwrap()
    }

    #[test]
    fn test_slicing() {
        let test = human("test");
        assert_eq!(test.take(3), human("tes"));
        assert_eq!(test.drop_prefix(3), human("t"));
        assert_eq!(test.take(10), test);
        assert_eq!(test.drop_prefix(10), human(""));
        assert_eq!(test.take(0), human(""));
    }

    #[test]
    fn test_concat_and_display() {
        let joined = human("te").concat(&human("st"));
        assert_eq!(joined.as_bytes(), b"4%34");
        assert_eq!(joined.to_string(), "test");
        assert_eq!(format!("{joined:?}"), "\"test\"");
    }
}
