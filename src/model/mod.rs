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

//! Data model for evaluation results
//!
//! This module provides the value type produced by the evaluator and the
//! body-alphabet string payload shared by literals and results.

#![warn(missing_docs)]

pub mod body_string;
pub mod value;

pub use body_string::BodyString;
pub use value::{Closure, Value};
