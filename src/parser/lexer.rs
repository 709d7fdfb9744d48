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

//! Token stream with a cursor

use std::iter::Peekable;
use std::vec;

use super::span::Spanned;
use super::tokenizer::Token;

/// Token stream consumed front to back by the parser
#[derive(Debug)]
pub struct TokenStream<'input> {
    tokens: Peekable<vec::IntoIter<Spanned<Token<'input>>>>,
    position: usize,
}

impl<'input> TokenStream<'input> {
    /// Create a new token stream
    pub fn new(tokens: Vec<Spanned<Token<'input>>>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            position: 0,
        }
    }

    /// Peek at the current token without consuming
    pub fn peek(&mut self) -> Option<&Spanned<Token<'input>>> {
        self.tokens.peek()
    }

    /// Consume and return the current token
    pub fn next(&mut self) -> Option<Spanned<Token<'input>>> {
        let token = self.tokens.next()?;
        self.position += 1;
        Some(token)
    }

    /// Check if we're at the end of the stream
    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Number of tokens consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of tokens not yet consumed
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenizer::Tokenizer;

    #[test]
    fn test_cursor() {
        let tokens = Tokenizer::new("T F ?").tokenize_all().unwrap();
        let mut stream = TokenStream::new(tokens);

        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.peek().map(|t| &t.value), Some(&Token::Boolean(true)));
        assert_eq!(stream.next().map(|t| t.value), Some(Token::Boolean(true)));
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.peek().map(|t| t.start), Some(2));
        stream.next();
        stream.next();
        assert!(stream.is_eof());
        assert!(stream.next().is_none());
        assert_eq!(stream.remaining(), 0);
        assert_eq!(stream.position(), 3);
    }
}
