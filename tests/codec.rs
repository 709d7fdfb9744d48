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

//! Body alphabet and base-94 properties

use icfp_lambda::BodyString;
use icfp_lambda::codec::{
    HUMAN_ALPHABET, decode_base94, decode_body, encode_base94, encode_body,
};
use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_base94_round_trip_beyond_10_pow_30() {
    let mut value = BigInt::from(0);
    let step = BigInt::from(10).pow(27u32) + BigInt::from(12_345_678_901u64);
    let limit = BigInt::from(10).pow(31u32);
    while value < limit {
        let digits = encode_base94(&value).unwrap();
        assert!(digits.iter().all(|b| (33..=126).contains(b)));
        assert_eq!(decode_base94(&digits).unwrap(), value);
        value += &step;
    }
}

#[rstest]
#[case(0, "!")]
#[case(93, "~")]
#[case(94, "\"!")]
#[case(1337, "/6")]
#[case(15818151, "4%34")]
fn test_base94_known_values(#[case] value: u64, #[case] digits: &str) {
    assert_eq!(encode_base94(&BigInt::from(value)).unwrap(), digits.as_bytes());
    assert_eq!(decode_base94(digits.as_bytes()).unwrap(), BigInt::from(value));
}

#[test]
fn test_body_alphabet_is_a_bijection() {
    let body: Vec<u8> = (33u8..=126).collect();
    let human = decode_body(&body).unwrap();
    assert_eq!(human.as_bytes(), HUMAN_ALPHABET);
    assert_eq!(encode_body(&human).unwrap(), body);
}

#[test]
fn test_body_string_helpers() {
    let text = BodyString::from_human("Hello World!").unwrap();
    assert_eq!(text.as_bytes(), b"B%,,/}Q/2,$_");
    assert_eq!(text.to_human().unwrap(), "Hello World!");
    assert_eq!(text.take(5).to_string(), "Hello");
}
