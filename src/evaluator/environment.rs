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

//! Variable environments
//!
//! An environment is a flat, immutable map from variable id to [`Thunk`].
//! Applying a closure builds a fresh map from three layers, later layers
//! winning: the caller's bindings, the bindings captured by the closure and
//! finally the parameter. Lookups never walk a parent chain.

use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;

use super::thunk::Thunk;
use crate::ast::VariableId;

/// Copy-on-write variable bindings
#[derive(Clone, Default)]
pub struct Environment {
    bindings: Rc<FxHashMap<VariableId, Thunk>>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the binding of a variable
    pub fn get(&self, id: VariableId) -> Option<&Thunk> {
        self.bindings.get(&id)
    }

    /// Check whether a variable is bound
    pub fn contains(&self, id: VariableId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Environment with one extra binding
    pub fn with_binding(&self, id: VariableId, thunk: Thunk) -> Self {
        let mut bindings = (*self.bindings).clone();
        bindings.insert(id, thunk);
        Self {
            bindings: Rc::new(bindings),
        }
    }

    /// Environment for applying a closure from this (the caller's) environment
    ///
    /// `captured` bindings override the caller's, and `parameter` overrides both.
    pub fn for_application(
        &self,
        captured: &Environment,
        parameter: VariableId,
        argument: Thunk,
    ) -> Self {
        let mut bindings = if self.is_empty() || Rc::ptr_eq(&self.bindings, &captured.bindings) {
            (*captured.bindings).clone()
        } else {
            let mut merged = (*self.bindings).clone();
            merged.extend(
                captured
                    .bindings
                    .iter()
                    .map(|(id, thunk)| (*id, thunk.clone())),
            );
            merged
        };
        bindings.insert(parameter, argument);
        Self {
            bindings: Rc::new(bindings),
        }
    }
}

impl Drop for Environment {
    // Bindings can chain through thunks and closures as deep as the evaluated
    // recursion went, so release them with an explicit work list.
    fn drop(&mut self) {
        let Some(bindings) = Rc::get_mut(&mut self.bindings) else {
            return;
        };
        let mut released = Vec::new();
        for thunk in std::mem::take(bindings).into_values() {
            thunk.release_into(&mut released);
        }
        while let Some(mut environment) = released.pop() {
            if let Some(bindings) = Rc::get_mut(&mut environment.bindings) {
                for thunk in std::mem::take(bindings).into_values() {
                    thunk.release_into(&mut released);
                }
            }
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.bindings.keys().copied().collect();
        ids.sort_unstable();
        f.debug_set().entries(ids.iter().map(|id| format!("v{id}"))).finish()
    }
}
