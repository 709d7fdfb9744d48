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

//! Fixed-point combinator preprocessor
//!
//! Programs generated for the token format often spell recursion with the
//! literal Y combinator applied to a function:
//!
//! ```text
//! B$ Lf B$ Lx B$ vf B$ vx vx Lx B$ vf B$ vx vx
//! ```
//!
//! The preprocessor rewrites every occurrence of that shape into the
//! Z combinator (the eta-expanded fixed point)
//!
//! ```text
//! B$ La B$ Lb B$ va Lc B$ B$ vb vb vc Lb B$ va Lc B$ B$ vb vb vc
//! ```
//!
//! where `a`, `b`, `c` are fresh variable ids. The rewrite works on tokens,
//! so any whitespace layout matches, and the output is whitespace-normalized
//! to single spaces.

use rustc_hash::FxHashSet;
use std::borrow::Cow;

use crate::codec;

/// Tokens in the Y-combinator application shape
const PATTERN_LENGTH: usize = 15;

fn split_tokens(source: &str) -> Vec<&str> {
    source
        .split([' ', '\t', '\r', '\n'])
        .filter(|token| !token.is_empty())
        .collect()
}

fn binder(token: &str, indicator: u8) -> Option<u64> {
    match token.as_bytes().split_first() {
        Some((&first, payload)) if first == indicator => codec::decode_base94_u64(payload).ok(),
        _ => None,
    }
}

fn variable_ids(tokens: &[&str]) -> FxHashSet<u64> {
    tokens
        .iter()
        .filter_map(|token| binder(token, b'L').or_else(|| binder(token, b'v')))
        .collect()
}

/// Match the Y-combinator application at the start of `window`
///
/// Returns the ids bound to the function (`f`) and self-application (`x`)
/// parameters.
fn match_y_combinator(window: &[&str]) -> Option<(u64, u64)> {
    if window.len() < PATTERN_LENGTH {
        return None;
    }
    let apply = |i: usize| window[i] == "B$";
    let lambda = |i: usize| binder(window[i], b'L');
    let var = |i: usize| binder(window[i], b'v');

    if !(apply(0) && apply(2) && apply(4) && apply(6) && apply(10) && apply(12)) {
        return None;
    }
    let f = lambda(1)?;
    let x = lambda(3)?;
    if f == x {
        return None;
    }

    let f_refs = [var(5), var(11)];
    let x_refs = [var(7), var(8), lambda(9), var(13), var(14)];
    let consistent =
        f_refs.iter().all(|id| *id == Some(f)) && x_refs.iter().all(|id| *id == Some(x));
    consistent.then_some((f, x))
}

fn encode_token(indicator: char, id: u64) -> String {
    let mut token = String::with_capacity(4);
    token.push(indicator);
    token.extend(codec::encode_base94_u64(id).into_iter().map(char::from));
    token
}

fn z_combinator(a: u64, b: u64, c: u64) -> Vec<String> {
    let apply = || "B$".to_string();
    let half = |out: &mut Vec<String>| {
        out.push(encode_token('L', b));
        out.push(apply());
        out.push(encode_token('v', a));
        out.push(encode_token('L', c));
        out.push(apply());
        out.push(apply());
        out.push(encode_token('v', b));
        out.push(encode_token('v', b));
        out.push(encode_token('v', c));
    };

    let mut out = Vec::with_capacity(21);
    out.push(apply());
    out.push(encode_token('L', a));
    out.push(apply());
    half(&mut out);
    half(&mut out);
    out
}

/// Allocate the smallest ids not present in `used`, recording them as used
fn fresh_ids<const N: usize>(used: &mut FxHashSet<u64>) -> [u64; N] {
    let mut ids = [0u64; N];
    let mut candidate = 0u64;
    for slot in ids.iter_mut() {
        while used.contains(&candidate) {
            candidate += 1;
        }
        *slot = candidate;
        used.insert(candidate);
    }
    ids
}

/// Rewrite literal Y-combinator applications into the Z combinator
///
/// Returns the input unchanged (borrowed) when no occurrence is found.
pub fn rewrite_combinators(source: &str) -> Cow<'_, str> {
    let tokens = split_tokens(source);
    let has_match = (0..tokens.len()).any(|i| match_y_combinator(&tokens[i..]).is_some());
    if !has_match {
        return Cow::Borrowed(source);
    }

    let mut used = variable_ids(&tokens);
    let mut output: Vec<Cow<'_, str>> = Vec::with_capacity(tokens.len() + 8);
    let mut rewrites = 0usize;
    let mut i = 0;
    while i < tokens.len() {
        if match_y_combinator(&tokens[i..]).is_some() {
            let [a, b, c] = fresh_ids::<3>(&mut used);
            output.extend(z_combinator(a, b, c).into_iter().map(Cow::Owned));
            rewrites += 1;
            i += PATTERN_LENGTH;
        } else {
            output.push(Cow::Borrowed(tokens[i]));
            i += 1;
        }
    }

    log::debug!("Rewrote {rewrites} fixed-point combinator application(s)");
    Cow::Owned(output.join(" "))
}
