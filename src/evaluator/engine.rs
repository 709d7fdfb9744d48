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

//! Call-by-need evaluator
//!
//! Evaluation runs on an explicit continuation stack instead of the native
//! call stack, so programs can recurse as deep as memory allows. The machine
//! alternates between two modes: evaluating a node under an environment, and
//! returning a value to the innermost pending [`Frame`].

use super::config::EngineConfig;
use super::environment::Environment;
use super::error::{EvaluationError, EvaluationResult};
use super::operations;
use super::thunk::{Demand, Thunk};
use crate::ast::{BinaryOperator, ExpressionKind, NodeRef, UnaryOperator};
use crate::model::{Closure, Value};

/// Counters collected during one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    /// Machine transitions
    pub steps: u64,
    /// Closure applications
    pub applications: u64,
    /// Thunks evaluated for the first time
    pub thunk_forces: u64,
    /// Variable lookups answered by an already forced thunk
    pub thunk_reuses: u64,
    /// Closed nodes answered from their memoized value
    pub cache_hits: u64,
    /// Deepest continuation stack reached
    pub max_stack_depth: usize,
}

/// Work the machine does next
enum Control {
    Eval(NodeRef, Environment),
    Return(Value),
}

/// Pending work waiting for a value
enum Frame {
    /// Record the value on a closed node
    Memoize(NodeRef),
    /// Record the value in a thunk being forced
    Update(Thunk),
    /// Apply a unary operator to the value
    Unary(UnaryOperator),
    /// Left operand done; evaluate the right one next
    Left {
        operator: BinaryOperator,
        right: NodeRef,
        environment: Environment,
    },
    /// Both operands done
    Right {
        operator: BinaryOperator,
        left: Value,
    },
    /// Function position done; bind the argument lazily and enter the body
    Apply {
        argument: NodeRef,
        environment: Environment,
    },
    /// Condition done; continue with one branch
    Branch {
        then_branch: NodeRef,
        else_branch: NodeRef,
        environment: Environment,
    },
}

/// Expression evaluator
///
/// The evaluator is stateless between runs apart from the values memoized on
/// closed nodes of the trees it evaluates.
#[derive(Debug, Clone)]
pub struct Evaluator {
    node_cache: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with default settings
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an evaluator from engine settings
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            node_cache: config.enable_node_cache,
        }
    }

    /// Evaluate a tree under an empty environment
    pub fn evaluate(&self, root: &NodeRef) -> EvaluationResult<Value> {
        self.evaluate_with_stats(root).map(|(value, _)| value)
    }

    /// Evaluate a tree under the given bindings
    pub fn evaluate_in(&self, root: &NodeRef, environment: Environment) -> EvaluationResult<Value> {
        self.run(root, environment).map(|(value, _)| value)
    }

    /// Evaluate a tree and report what the machine did
    pub fn evaluate_with_stats(&self, root: &NodeRef) -> EvaluationResult<(Value, EvaluationStats)> {
        self.run(root, Environment::new())
    }

    fn run(
        &self,
        root: &NodeRef,
        environment: Environment,
    ) -> EvaluationResult<(Value, EvaluationStats)> {
        let mut stats = EvaluationStats::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut control = Control::Eval(root.clone(), environment);

        loop {
            stats.steps += 1;
            stats.max_stack_depth = stats.max_stack_depth.max(stack.len());

            control = match control {
                Control::Eval(node, environment) => {
                    self.eval_node(node, environment, &mut stack, &mut stats)?
                }
                Control::Return(value) => match stack.pop() {
                    Some(frame) => Self::resume(frame, value, &mut stack, &mut stats)?,
                    None => {
                        log::debug!(
                            "Evaluated in {} steps: {} applications, {} thunk forces, {} thunk reuses, {} cache hits",
                            stats.steps,
                            stats.applications,
                            stats.thunk_forces,
                            stats.thunk_reuses,
                            stats.cache_hits
                        );
                        return Ok((value, stats));
                    }
                },
            };
        }
    }

    fn eval_node(
        &self,
        node: NodeRef,
        environment: Environment,
        stack: &mut Vec<Frame>,
        stats: &mut EvaluationStats,
    ) -> EvaluationResult<Control> {
        if self.node_cache && node.is_memoizable() {
            if let Some(value) = node.cached_value() {
                stats.cache_hits += 1;
                return Ok(Control::Return(value.clone()));
            }
            stack.push(Frame::Memoize(node.clone()));
        }

        let control = match node.kind() {
            ExpressionKind::Boolean(b) => Control::Return(Value::Boolean(*b)),
            ExpressionKind::Integer(i) => Control::Return(Value::Integer(i.clone())),
            ExpressionKind::String(s) => Control::Return(Value::String(s.clone())),
            ExpressionKind::Undefined => Control::Return(Value::Undefined),

            ExpressionKind::Variable(id) => match environment.get(*id) {
                None => Control::Return(Value::Undefined),
                Some(thunk) => match thunk.demand() {
                    Demand::Ready(value) => {
                        stats.thunk_reuses += 1;
                        Control::Return(value)
                    }
                    Demand::Evaluate(expression, captured) => {
                        stats.thunk_forces += 1;
                        stack.push(Frame::Update(thunk.clone()));
                        Control::Eval(expression, captured)
                    }
                    Demand::Cycle => return Err(EvaluationError::CyclicThunk { variable: *id }),
                },
            },

            ExpressionKind::Unary { operator, operand } => {
                stack.push(Frame::Unary(*operator));
                Control::Eval(operand.clone(), environment)
            }

            ExpressionKind::Binary {
                operator: BinaryOperator::Apply,
                left,
                right,
            } => {
                stack.push(Frame::Apply {
                    argument: right.clone(),
                    environment: environment.clone(),
                });
                Control::Eval(left.clone(), environment)
            }

            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => {
                stack.push(Frame::Left {
                    operator: *operator,
                    right: right.clone(),
                    environment: environment.clone(),
                });
                Control::Eval(left.clone(), environment)
            }

            ExpressionKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                stack.push(Frame::Branch {
                    then_branch: then_branch.clone(),
                    else_branch: else_branch.clone(),
                    environment: environment.clone(),
                });
                Control::Eval(condition.clone(), environment)
            }

            ExpressionKind::Lambda { parameter, body } => Control::Return(Value::Closure(Closure {
                parameter: *parameter,
                body: body.clone(),
                environment,
            })),
        };
        Ok(control)
    }

    fn resume(
        frame: Frame,
        value: Value,
        stack: &mut Vec<Frame>,
        stats: &mut EvaluationStats,
    ) -> EvaluationResult<Control> {
        let control = match frame {
            Frame::Memoize(node) => {
                node.memoize(&value);
                Control::Return(value)
            }
            Frame::Update(thunk) => {
                thunk.fill(value.clone());
                Control::Return(value)
            }
            Frame::Unary(operator) => Control::Return(operations::apply_unary(operator, &value)?),
            Frame::Left {
                operator,
                right,
                environment,
            } => {
                stack.push(Frame::Right {
                    operator,
                    left: value,
                });
                Control::Eval(right, environment)
            }
            Frame::Right { operator, left } => {
                Control::Return(operations::apply_binary(operator, &left, &value)?)
            }
            Frame::Apply {
                argument,
                environment,
            } => {
                let closure = match value {
                    Value::Closure(closure) => closure,
                    other => {
                        return Err(EvaluationError::type_mismatch(
                            BinaryOperator::Apply,
                            "Closure",
                            &other,
                        ));
                    }
                };
                stats.applications += 1;
                log::trace!("Applying λ{}", closure.parameter);

                let Closure {
                    parameter,
                    body,
                    environment: captured,
                } = closure;
                let thunk = Thunk::pending(argument, environment.clone());
                let environment = environment.for_application(&captured, parameter, thunk);
                Control::Eval(body, environment)
            }
            Frame::Branch {
                then_branch,
                else_branch,
                environment,
            } => match value {
                Value::Boolean(true) => Control::Eval(then_branch, environment),
                Value::Boolean(false) => Control::Eval(else_branch, environment),
                other => return Err(EvaluationError::type_mismatch("if", "Boolean", &other)),
            },
        };
        Ok(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExpressionNode, VariableId};
    use crate::parser::parse_expression;

    fn eval(source: &str) -> EvaluationResult<Value> {
        Evaluator::new().evaluate(&parse_expression(source).unwrap())
    }

    #[test]
    fn test_atoms() {
        assert_eq!(eval("T"), Ok(Value::from(true)));
        assert_eq!(eval("I/6"), Ok(Value::from(1337i64)));
        assert_eq!(eval("v#"), Ok(Value::Undefined));
        assert_eq!(eval(""), Ok(Value::Undefined));
    }

    #[test]
    fn test_lambda_is_a_closure() {
        let value = eval("L# v#").unwrap();
        assert_eq!(value.to_string(), "<closure λ2>");
    }

    #[test]
    fn test_application_binds_lazily() {
        // (λx. 1) (1 / 0) never divides
        assert_eq!(eval("B$ L# I\" B/ I\" I!"), Ok(Value::from(1i64)));
    }

    #[test]
    fn test_apply_requires_closure() {
        assert_eq!(
            eval("B$ I\" I\""),
            Err(EvaluationError::TypeMismatch {
                operator: "apply".to_string(),
                expected: "Closure",
                actual: "Integer",
            })
        );
    }

    #[test]
    fn test_condition_must_be_boolean() {
        assert!(matches!(
            eval("? I! T F"),
            Err(EvaluationError::TypeMismatch { ref operator, .. }) if operator == "if"
        ));
    }

    #[test]
    fn test_thunk_shared_between_uses() {
        // (λx. x + x) (3 * 2)
        let tree = parse_expression("B$ L# B+ v# v# B* I$ I#").unwrap();
        let (value, stats) = Evaluator::new().evaluate_with_stats(&tree).unwrap();
        assert_eq!(value, Value::from(12i64));
        assert_eq!(stats.applications, 1);
        assert_eq!(stats.thunk_forces, 1);
        assert_eq!(stats.thunk_reuses, 1);
    }

    #[test]
    fn test_self_dependent_binding_is_cyclic() {
        let x = VariableId(1);
        let looping = Thunk::pending(ExpressionNode::variable(x), Environment::new());
        let env = Environment::new().with_binding(x, looping.clone());

        // Leave the thunk in the middle of being forced
        let _ = looping.demand();
        assert_eq!(
            Evaluator::new().evaluate_in(&ExpressionNode::variable(x), env),
            Err(EvaluationError::CyclicThunk { variable: x })
        );
    }

    #[test]
    fn test_deep_recursion_uses_heap_stack() {
        // Sum 1..=n through a self-applied function:
        // (λf. f f n) (λs. λk. if k = 0 then 0 else k + s s (k - 1))
        let n = 20_000;
        let source = format!(
            "B$ B$ L\" B$ v\" v\" L# L$ ? B= v$ I! I! B+ v$ B$ B$ v# v# B- v$ I\" I{}",
            String::from_utf8(crate::codec::encode_base94_u64(n)).unwrap()
        );
        let tree = parse_expression(&source).unwrap();
        let (value, stats) = Evaluator::new().evaluate_with_stats(&tree).unwrap();
        assert_eq!(value, Value::from((n * (n + 1) / 2) as i64));
        assert!(stats.max_stack_depth > n as usize);
    }
}
