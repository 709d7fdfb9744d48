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

//! Expression tree nodes

use num_bigint::BigInt;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use super::operator::{BinaryOperator, UnaryOperator};
use crate::model::{BodyString, Value};

/// Shared handle to a parsed node
///
/// Closures and thunks keep the nodes they refer to alive, so nodes are
/// reference counted rather than owned by a single tree.
pub type NodeRef = Rc<ExpressionNode>;

/// Variable name: a base-94 decoded integer
///
/// Names are not scoped; an inner lambda with the same id shadows the outer
/// binding by overwriting it in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u64);

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Syntactic forms of the token language
#[derive(Debug)]
pub enum ExpressionKind {
    /// Boolean literal (`T` / `F`)
    Boolean(bool),
    /// Integer literal (`I`)
    Integer(BigInt),
    /// String literal (`S`)
    String(BodyString),
    /// Unary operation (`U`)
    Unary {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        operand: NodeRef,
    },
    /// Binary operation (`B`), including application
    Binary {
        /// Operator
        operator: BinaryOperator,
        /// Left operand (the function, for application)
        left: NodeRef,
        /// Right operand (the argument, for application)
        right: NodeRef,
    },
    /// Conditional (`?`)
    If {
        /// Condition, must force to a boolean
        condition: NodeRef,
        /// Branch taken when the condition holds
        then_branch: NodeRef,
        /// Branch taken otherwise
        else_branch: NodeRef,
    },
    /// Lambda abstraction (`L`)
    Lambda {
        /// Bound variable
        parameter: VariableId,
        /// Body
        body: NodeRef,
    },
    /// Variable reference (`v`)
    Variable(VariableId),
    /// Malformed token or missing operand
    Undefined,
}

/// A node of the expression tree with its memoization slot
///
/// Nodes without free variables (closed nodes) produce the same value under
/// every environment. Compound closed nodes record their value on first force
/// and answer later forces from the cache.
pub struct ExpressionNode {
    kind: ExpressionKind,
    free_variables: Box<[VariableId]>,
    cache: OnceCell<Value>,
}

impl ExpressionNode {
    fn with_free(kind: ExpressionKind, free_variables: Vec<VariableId>) -> NodeRef {
        Rc::new(Self {
            kind,
            free_variables: free_variables.into_boxed_slice(),
            cache: OnceCell::new(),
        })
    }

    fn atom(kind: ExpressionKind) -> NodeRef {
        Self::with_free(kind, Vec::new())
    }

    /// Boolean literal
    pub fn boolean(value: bool) -> NodeRef {
        Self::atom(ExpressionKind::Boolean(value))
    }

    /// Integer literal
    pub fn integer(value: impl Into<BigInt>) -> NodeRef {
        Self::atom(ExpressionKind::Integer(value.into()))
    }

    /// String literal from body bytes
    pub fn string(value: BodyString) -> NodeRef {
        Self::atom(ExpressionKind::String(value))
    }

    /// Undefined placeholder
    pub fn undefined() -> NodeRef {
        Self::atom(ExpressionKind::Undefined)
    }

    /// Variable reference
    pub fn variable(id: VariableId) -> NodeRef {
        Self::with_free(ExpressionKind::Variable(id), vec![id])
    }

    /// Unary operation
    pub fn unary(operator: UnaryOperator, operand: NodeRef) -> NodeRef {
        let free = operand.free_variables.to_vec();
        Self::with_free(ExpressionKind::Unary { operator, operand }, free)
    }

    /// Binary operation
    pub fn binary(operator: BinaryOperator, left: NodeRef, right: NodeRef) -> NodeRef {
        let free = merge_free(&left.free_variables, &right.free_variables);
        Self::with_free(
            ExpressionKind::Binary {
                operator,
                left,
                right,
            },
            free,
        )
    }

    /// Application, the `B$` form
    pub fn apply(function: NodeRef, argument: NodeRef) -> NodeRef {
        Self::binary(BinaryOperator::Apply, function, argument)
    }

    /// Conditional
    pub fn if_then_else(condition: NodeRef, then_branch: NodeRef, else_branch: NodeRef) -> NodeRef {
        let free = merge_free(
            &merge_free(&condition.free_variables, &then_branch.free_variables),
            &else_branch.free_variables,
        );
        Self::with_free(
            ExpressionKind::If {
                condition,
                then_branch,
                else_branch,
            },
            free,
        )
    }

    /// Lambda abstraction
    pub fn lambda(parameter: VariableId, body: NodeRef) -> NodeRef {
        let free = body
            .free_variables
            .iter()
            .copied()
            .filter(|&id| id != parameter)
            .collect();
        Self::with_free(ExpressionKind::Lambda { parameter, body }, free)
    }

    /// Syntactic form of this node
    #[inline]
    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    /// Variables referenced but not bound inside this node, sorted
    pub fn free_variables(&self) -> &[VariableId] {
        &self.free_variables
    }

    /// True when the node has no free variables
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.free_variables.is_empty()
    }

    /// True when forcing this node is worth memoizing on the node itself
    ///
    /// Atoms and lambdas are constant-time to evaluate; variables depend on
    /// the environment.
    #[inline]
    pub fn is_memoizable(&self) -> bool {
        self.is_closed()
            && matches!(
                self.kind,
                ExpressionKind::Unary { .. } | ExpressionKind::Binary { .. } | ExpressionKind::If { .. }
            )
    }

    /// Value recorded by an earlier force, if any
    #[inline]
    pub fn cached_value(&self) -> Option<&Value> {
        self.cache.get()
    }

    /// Record the value of a memoizable node; the first write wins
    ///
    /// Closures are never recorded: applying one layers its environment over
    /// the caller's, so it carries bindings of the call site that built it.
    pub(crate) fn memoize(&self, value: &Value) {
        if self.is_memoizable() && value.as_closure().is_none() {
            let _ = self.cache.set(value.clone());
        }
    }

    /// Number of nodes in this tree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            node.kind.for_each_child(|child| stack.push(child));
        }
        count
    }
}

impl ExpressionKind {
    /// Visit direct children in operand order
    pub fn for_each_child<'a>(&'a self, mut visit: impl FnMut(&'a ExpressionNode)) {
        match self {
            ExpressionKind::Unary { operand, .. } => visit(operand.as_ref()),
            ExpressionKind::Binary { left, right, .. } => {
                visit(left.as_ref());
                visit(right.as_ref());
            }
            ExpressionKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                visit(condition.as_ref());
                visit(then_branch.as_ref());
                visit(else_branch.as_ref());
            }
            ExpressionKind::Lambda { body, .. } => visit(body.as_ref()),
            _ => {}
        }
    }

    fn take_children(&mut self, into: &mut Vec<NodeRef>) {
        match std::mem::replace(self, ExpressionKind::Undefined) {
            ExpressionKind::Unary { operand, .. } => into.push(operand),
            ExpressionKind::Binary { left, right, .. } => {
                into.push(left);
                into.push(right);
            }
            ExpressionKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                into.push(condition);
                into.push(then_branch);
                into.push(else_branch);
            }
            ExpressionKind::Lambda { body, .. } => into.push(body),
            _ => {}
        }
    }
}

// Generated programs nest thousands of levels deep; unlink children
// iteratively so dropping a tree never recurses.
impl Drop for ExpressionNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.kind.take_children(&mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                node.kind.take_children(&mut pending);
            }
        }
    }
}

impl fmt::Debug for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

fn merge_free(a: &[VariableId], b: &[VariableId]) -> Vec<VariableId> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                merged.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Environment;
    use crate::model::Closure;

    fn var(id: u64) -> NodeRef {
        ExpressionNode::variable(VariableId(id))
    }

    #[test]
    fn test_free_variables() {
        // λ1. (+ v1 v2)
        let add = ExpressionNode::binary(BinaryOperator::Add, var(1), var(2));
        assert_eq!(add.free_variables(), &[VariableId(1), VariableId(2)]);

        let lambda = ExpressionNode::lambda(VariableId(1), add);
        assert_eq!(lambda.free_variables(), &[VariableId(2)]);
        assert!(!lambda.is_closed());

        let closed = ExpressionNode::lambda(VariableId(2), lambda);
        assert!(closed.is_closed());
        assert!(!closed.is_memoizable());
    }

    #[test]
    fn test_memoizable_nodes() {
        let sum = ExpressionNode::binary(
            BinaryOperator::Add,
            ExpressionNode::integer(1),
            ExpressionNode::integer(2),
        );
        assert!(sum.is_memoizable());
        assert!(!ExpressionNode::integer(1).is_memoizable());
        assert!(!var(1).is_memoizable());

        sum.memoize(&Value::from(3i64));
        sum.memoize(&Value::from(4i64));
        assert_eq!(sum.cached_value(), Some(&Value::from(3i64)));
    }

    #[test]
    fn test_closures_are_not_memoized() {
        // (apply (λ1 (λ2 v2)) 0)
        let node = ExpressionNode::apply(
            ExpressionNode::lambda(
                VariableId(1),
                ExpressionNode::lambda(VariableId(2), var(2)),
            ),
            ExpressionNode::integer(0),
        );
        assert!(node.is_memoizable());

        node.memoize(&Value::Closure(Closure {
            parameter: VariableId(2),
            body: var(2),
            environment: Environment::new(),
        }));
        assert_eq!(node.cached_value(), None);
    }

    #[test]
    fn test_deep_tree_drops_without_recursion() {
        let mut node = ExpressionNode::integer(0);
        for _ in 0..200_000 {
            node = ExpressionNode::unary(UnaryOperator::Negate, node);
        }
        assert_eq!(node.node_count(), 200_001);
        drop(node);
    }

    #[test]
    fn test_merge_free_dedups() {
        let a = [VariableId(1), VariableId(3)];
        let b = [VariableId(2), VariableId(3), VariableId(4)];
        assert_eq!(
            merge_free(&a, &b),
            vec![VariableId(1), VariableId(2), VariableId(3), VariableId(4)]
        );
    }
}
