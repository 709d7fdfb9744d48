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

//! Rendering expression trees
//!
//! Two renderings are provided: an s-expression view for humans (`Display`)
//! and the token format itself (`to_source`). Both walk the tree with an
//! explicit stack.

use num_bigint::Sign;
use std::fmt;

use super::expression::{ExpressionKind, ExpressionNode};
use crate::codec;

/// Token emitted for `Undefined` nodes; lenient parsing reads it back as `Undefined`
pub const UNDEFINED_TOKEN: &str = "_";

enum Item<'a> {
    Node(&'a ExpressionNode),
    Text(&'static str),
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Item::Node(self)];
        while let Some(item) = stack.pop() {
            let node = match item {
                Item::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Item::Node(node) => node,
            };

            match node.kind() {
                ExpressionKind::Boolean(b) => write!(f, "{b}")?,
                ExpressionKind::Integer(i) => write!(f, "{i}")?,
                ExpressionKind::String(s) => write!(f, "{s:?}")?,
                ExpressionKind::Variable(id) => write!(f, "v{id}")?,
                ExpressionKind::Undefined => f.write_str("<undef>")?,
                ExpressionKind::Unary { operator, operand } => {
                    write!(f, "({operator} ")?;
                    stack.push(Item::Text(")"));
                    stack.push(Item::Node(operand));
                }
                ExpressionKind::Binary {
                    operator,
                    left,
                    right,
                } => {
                    write!(f, "({operator} ")?;
                    stack.push(Item::Text(")"));
                    stack.push(Item::Node(right));
                    stack.push(Item::Text(" "));
                    stack.push(Item::Node(left));
                }
                ExpressionKind::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    f.write_str("(if ")?;
                    stack.push(Item::Text(")"));
                    stack.push(Item::Node(else_branch));
                    stack.push(Item::Text(" "));
                    stack.push(Item::Node(then_branch));
                    stack.push(Item::Text(" "));
                    stack.push(Item::Node(condition));
                }
                ExpressionKind::Lambda { parameter, body } => {
                    write!(f, "(λ{parameter} ")?;
                    stack.push(Item::Text(")"));
                    stack.push(Item::Node(body));
                }
            }
        }
        Ok(())
    }
}

impl ExpressionNode {
    /// Render the tree back into the token format
    ///
    /// Tokens are emitted in prefix order separated by single spaces, so
    /// parsing the result rebuilds the same tree. Negative integers, which
    /// have no literal form, are emitted as a negation of their magnitude.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !out.is_empty() {
                out.push(' ');
            }
            match node.kind() {
                ExpressionKind::Boolean(true) => out.push('T'),
                ExpressionKind::Boolean(false) => out.push('F'),
                ExpressionKind::Integer(i) => {
                    if i.sign() == Sign::Minus {
                        out.push_str("U- ");
                    }
                    out.push('I');
                    push_body(&mut out, &codec::encode_base94_unsigned(i.magnitude()));
                }
                ExpressionKind::String(s) => {
                    out.push('S');
                    push_body(&mut out, s.as_bytes());
                }
                ExpressionKind::Unary { operator, operand } => {
                    out.push('U');
                    out.push(operator.symbol());
                    stack.push(operand);
                }
                ExpressionKind::Binary {
                    operator,
                    left,
                    right,
                } => {
                    out.push('B');
                    out.push(operator.symbol());
                    stack.push(right);
                    stack.push(left);
                }
                ExpressionKind::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    out.push('?');
                    stack.push(else_branch);
                    stack.push(then_branch);
                    stack.push(condition);
                }
                ExpressionKind::Lambda { parameter, body } => {
                    out.push('L');
                    push_body(&mut out, &codec::encode_base94_u64(parameter.0));
                    stack.push(body);
                }
                ExpressionKind::Variable(id) => {
                    out.push('v');
                    push_body(&mut out, &codec::encode_base94_u64(id.0));
                }
                ExpressionKind::Undefined => out.push_str(UNDEFINED_TOKEN),
            }
        }
        out
    }
}

fn push_body(out: &mut String, bytes: &[u8]) {
    out.extend(bytes.iter().map(|&b| b as char));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, UnaryOperator, VariableId};
    use crate::model::BodyString;

    fn sample() -> crate::ast::NodeRef {
        // (λ2 (if (> v2 0) "yes" (neg v2))) applied to 3
        let x = VariableId(2);
        let body = ExpressionNode::if_then_else(
            ExpressionNode::binary(
                BinaryOperator::GreaterThan,
                ExpressionNode::variable(x),
                ExpressionNode::integer(0),
            ),
            ExpressionNode::string(BodyString::from_human("yes").unwrap()),
            ExpressionNode::unary(UnaryOperator::Negate, ExpressionNode::variable(x)),
        );
        ExpressionNode::apply(ExpressionNode::lambda(x, body), ExpressionNode::integer(3))
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "(apply (λ2 (if (> v2 0) \"yes\" (neg v2))) 3)"
        );
    }

    #[test]
    fn test_to_source() {
        assert_eq!(sample().to_source(), "B$ L# ? B> v# I! S9%3 U- v# I$");
    }

    #[test]
    fn test_negative_integer_source() {
        assert_eq!(ExpressionNode::integer(-3).to_source(), "U- I$");
        assert_eq!(ExpressionNode::undefined().to_source(), "_");
    }
}
