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

//! Call-by-need argument cells

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::environment::Environment;
use crate::ast::NodeRef;
use crate::model::Value;

enum ThunkState {
    /// Not yet demanded
    Pending {
        expression: NodeRef,
        environment: Environment,
    },
    /// Being computed; demanding it again is a cycle
    Forcing,
    /// Computed once, shared by every later use
    Forced(Value),
}

/// What a variable lookup has to do with a thunk
pub(crate) enum Demand {
    /// The value is already known
    Ready(Value),
    /// Evaluate this expression, then [`Thunk::fill`] the thunk with the result
    Evaluate(NodeRef, Environment),
    /// The thunk is already being computed
    Cycle,
}

/// Shared, lazily computed binding of a variable
///
/// Cloning a thunk shares the cell: whichever use forces it first computes
/// the value and every other clone sees the result.
#[derive(Clone)]
pub struct Thunk(Rc<RefCell<ThunkState>>);

impl Thunk {
    /// Create a thunk that evaluates `expression` under `environment` on first use
    pub fn pending(expression: NodeRef, environment: Environment) -> Self {
        Self(Rc::new(RefCell::new(ThunkState::Pending {
            expression,
            environment,
        })))
    }

    /// Create a thunk holding an already known value
    pub fn forced(value: Value) -> Self {
        Self(Rc::new(RefCell::new(ThunkState::Forced(value))))
    }

    /// Value of the thunk, if it has been forced
    pub fn value(&self) -> Option<Value> {
        match &*self.0.borrow() {
            ThunkState::Forced(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Check whether the thunk has been forced
    pub fn is_forced(&self) -> bool {
        matches!(&*self.0.borrow(), ThunkState::Forced(_))
    }

    /// Start forcing the thunk
    ///
    /// A pending thunk moves to the forcing state and hands out its
    /// expression; the caller must [`fill`](Self::fill) it afterwards.
    pub(crate) fn demand(&self) -> Demand {
        let mut state = self.0.borrow_mut();
        match std::mem::replace(&mut *state, ThunkState::Forcing) {
            ThunkState::Pending {
                expression,
                environment,
            } => Demand::Evaluate(expression, environment),
            ThunkState::Forced(value) => {
                *state = ThunkState::Forced(value.clone());
                Demand::Ready(value)
            }
            ThunkState::Forcing => Demand::Cycle,
        }
    }

    /// Record the value of a forced thunk
    pub(crate) fn fill(&self, value: Value) {
        *self.0.borrow_mut() = ThunkState::Forced(value);
    }

    /// Release the thunk, handing out the environment it keeps alive
    ///
    /// Used by [`Environment`]'s drop to tear down long chains of bindings
    /// without recursion.
    pub(crate) fn release_into(self, environments: &mut Vec<Environment>) {
        let Ok(cell) = Rc::try_unwrap(self.0) else {
            return;
        };
        match cell.into_inner() {
            ThunkState::Pending { environment, .. } => environments.push(environment),
            ThunkState::Forced(Value::Closure(closure)) => environments.push(closure.environment),
            _ => {}
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow().as_deref() {
            Ok(ThunkState::Pending { expression, .. }) => write!(f, "Thunk(pending {expression})"),
            Ok(ThunkState::Forcing) | Err(_) => write!(f, "Thunk(forcing)"),
            Ok(ThunkState::Forced(value)) => write!(f, "Thunk({value:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionNode;

    #[test]
    fn test_demand_lifecycle() {
        let thunk = Thunk::pending(ExpressionNode::integer(5), Environment::new());
        assert!(!thunk.is_forced());

        let Demand::Evaluate(expression, _) = thunk.demand() else {
            panic!("pending thunk should hand out its expression");
        };
        assert_eq!(expression.to_string(), "5");

        // Demanded again before being filled
        assert!(matches!(thunk.demand(), Demand::Cycle));

        thunk.fill(Value::from(5i64));
        assert!(matches!(thunk.demand(), Demand::Ready(Value::Integer(_))));
        assert_eq!(thunk.value(), Some(Value::from(5i64)));
    }

    #[test]
    fn test_clones_share_the_cell() {
        let thunk = Thunk::pending(ExpressionNode::boolean(true), Environment::new());
        let shared = thunk.clone();
        thunk.fill(Value::from(true));
        assert!(shared.is_forced());
        assert_eq!(Thunk::forced(Value::Undefined).value(), Some(Value::Undefined));
    }
}
