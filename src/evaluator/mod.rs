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

//! Call-by-need expression evaluator
//!
//! This module reduces parsed trees to values: closures capture flat
//! environments, arguments are bound as thunks forced at most once, and
//! closed subtrees memoize their value on the node.

#![warn(missing_docs)]

mod config;
mod engine;
mod environment;
mod error;
pub mod operations;
mod thunk;

pub use config::EngineConfig;
pub use engine::{EvaluationStats, Evaluator};
pub use environment::Environment;
pub use error::{EvaluationError, EvaluationResult};
pub use thunk::Thunk;
