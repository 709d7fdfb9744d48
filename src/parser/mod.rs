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

//! Token-format parser
//!
//! This module turns source text into an expression tree in three steps:
//! the optional fixed-point combinator rewrite, whitespace tokenization and
//! arity-driven prefix parsing.

#![warn(missing_docs)]

pub mod combinator;
pub mod error;
pub mod lexer;
pub mod prefix;
pub mod span;
pub mod tokenizer;

pub use combinator::rewrite_combinators;
pub use error::{ParseError, ParseResult};
pub use lexer::TokenStream;
pub use prefix::PrefixParser;
pub use span::Spanned;
pub use tokenizer::{Token, Tokenizer};

use crate::ast::NodeRef;

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Rewrite literal Y-combinator applications before tokenizing
    pub rewrite_combinators: bool,
    /// Fail on malformed tokens instead of parsing them as `Undefined`
    pub strict_tokens: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            rewrite_combinators: true,
            strict_tokens: false,
        }
    }
}

/// Parse source text with default options
pub fn parse_expression(input: &str) -> ParseResult<NodeRef> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse source text into a tree
pub fn parse_with_options(input: &str, options: ParseOptions) -> ParseResult<NodeRef> {
    let source = if options.rewrite_combinators {
        rewrite_combinators(input)
    } else {
        input.into()
    };

    let tokens = Tokenizer::with_strict(&source, options.strict_tokens).tokenize_all()?;
    Ok(PrefixParser::new(TokenStream::new(tokens)).parse())
}
