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

//! Prefix-notation parser
//!
//! Every token has a fixed arity (0 for atoms, 1 for unary operators and
//! lambdas, 2 for binary operators, 3 for conditionals) and its operands
//! follow it directly, so the tree is rebuilt by attaching the next complete
//! subtrees to the most recent unfinished token. The parser keeps unfinished
//! tokens on an explicit stack, so nesting depth is not limited by the
//! native call stack.

use super::lexer::TokenStream;
use super::tokenizer::Token;
use crate::ast::{ExpressionNode, NodeRef};
use crate::model::BodyString;

/// Token waiting for its operands
struct Pending<'input> {
    token: Token<'input>,
    operands: Vec<NodeRef>,
}

impl<'input> Pending<'input> {
    fn new(token: Token<'input>) -> Self {
        let operands = Vec::with_capacity(token.arity());
        Self { token, operands }
    }

    fn is_complete(&self) -> bool {
        self.operands.len() >= self.token.arity()
    }

    fn build(self) -> NodeRef {
        let mut operands = self.operands.into_iter();
        let mut operand = || operands.next().unwrap_or_else(ExpressionNode::undefined);

        match self.token {
            Token::Unary(operator) => ExpressionNode::unary(operator, operand()),
            Token::Binary(operator) => {
                let left = operand();
                let right = operand();
                ExpressionNode::binary(operator, left, right)
            }
            Token::If => {
                let condition = operand();
                let then_branch = operand();
                let else_branch = operand();
                ExpressionNode::if_then_else(condition, then_branch, else_branch)
            }
            Token::Lambda(parameter) => ExpressionNode::lambda(parameter, operand()),
            atom => build_atom(atom),
        }
    }
}

fn build_atom(token: Token<'_>) -> NodeRef {
    match token {
        Token::Boolean(b) => ExpressionNode::boolean(b),
        Token::Integer(i) => ExpressionNode::integer(i),
        Token::String(bytes) => ExpressionNode::string(BodyString::from_body(bytes)),
        Token::Variable(id) => ExpressionNode::variable(id),
        _ => ExpressionNode::undefined(),
    }
}

/// Parser over a token stream
pub struct PrefixParser<'input> {
    stream: TokenStream<'input>,
}

impl<'input> PrefixParser<'input> {
    /// Create a parser over a token stream
    pub fn new(stream: TokenStream<'input>) -> Self {
        Self { stream }
    }

    /// Build the first complete expression of the stream
    ///
    /// Tokens after the first complete expression are ignored. When the input
    /// runs out before an operator has all its operands, the missing operands
    /// become `Undefined`; an empty stream parses as `Undefined`.
    pub fn parse(mut self) -> NodeRef {
        let mut stack: Vec<Pending<'input>> = Vec::new();
        let mut missing = 0usize;

        loop {
            let mut completed = match self.stream.next() {
                Some(spanned) if spanned.value.arity() > 0 => {
                    stack.push(Pending::new(spanned.value));
                    continue;
                }
                Some(spanned) => build_atom(spanned.value),
                None => {
                    missing += 1;
                    ExpressionNode::undefined()
                }
            };

            // Attach the finished subtree, completing parents as they fill up
            loop {
                let Some(mut parent) = stack.pop() else {
                    if missing > 0 && self.stream.position() > 0 {
                        log::debug!("Input ended early; {missing} operand(s) filled with undefined");
                    }
                    let remaining = self.stream.remaining();
                    if let Some(trailing) = self.stream.peek() {
                        log::debug!(
                            "Ignoring {remaining} trailing token(s) from byte {}",
                            trailing.start
                        );
                    }
                    return completed;
                };

                parent.operands.push(completed);
                if !parent.is_complete() {
                    stack.push(parent);
                    break;
                }
                completed = parent.build();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, ExpressionKind, UnaryOperator, VariableId};
    use crate::parser::tokenizer::Tokenizer;

    fn parse(input: &str) -> NodeRef {
        let tokens = Tokenizer::new(input).tokenize_all().unwrap();
        PrefixParser::new(TokenStream::new(tokens)).parse()
    }

    #[test]
    fn test_atoms() {
        assert!(matches!(parse("T").kind(), ExpressionKind::Boolean(true)));
        assert!(matches!(parse("v!").kind(), ExpressionKind::Variable(VariableId(0))));
        assert!(matches!(parse("").kind(), ExpressionKind::Undefined));
    }

    #[test]
    fn test_nested_operands_attach_in_order() {
        let tree = parse("B- I$ I#");
        let ExpressionKind::Binary {
            operator,
            left,
            right,
        } = tree.kind()
        else {
            panic!("expected binary node, got {tree}");
        };
        assert_eq!(*operator, BinaryOperator::Subtract);
        assert_eq!(left.to_string(), "3");
        assert_eq!(right.to_string(), "2");

        assert_eq!(
            parse("? B> I# I$ S9%3 S./").to_string(),
            "(if (> 2 3) \"yes\" \"no\")"
        );
        assert_eq!(
            parse("B$ L# B$ L\" B+ v\" v\" B* I$ I# v8").to_string(),
            "(apply (λ2 (apply (λ1 (+ v1 v1)) (* 3 2))) v23)"
        );
    }

    #[test]
    fn test_missing_operands_become_undefined() {
        assert_eq!(parse("B+ I#").to_string(), "(+ 2 <undef>)");
        assert_eq!(parse("? T").to_string(), "(if true <undef> <undef>)");
        assert_eq!(parse("U-").to_string(), "(neg <undef>)");
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        assert_eq!(parse("I# I$ I%").to_string(), "2");
        assert_eq!(parse("U- I$ T F").to_string(), "(neg 3)");
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 100_000;
        let mut source = "U- ".repeat(depth);
        source.push_str("I\"");
        let tree = parse(&source);
        assert_eq!(tree.node_count(), depth + 1);
        assert!(matches!(
            tree.kind(),
            ExpressionKind::Unary {
                operator: UnaryOperator::Negate,
                ..
            }
        ));
    }

    #[test]
    fn test_source_round_trip() {
        let source = "B$ B$ L# L$ v# B. SB%,,/ S}Q/2,$_ IK";
        let tree = parse(source);
        assert_eq!(tree.to_source(), source);
        assert_eq!(parse(&tree.to_source()).to_string(), tree.to_string());
    }
}
