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

//! Evaluator for the ICFP 2024 token language
//!
//! Programs are whitespace-separated tokens in prefix notation. This crate
//! decodes them ([`codec`]), parses them into trees ([`parser`], [`ast`]) and
//! reduces the trees to values under call-by-need semantics ([`evaluator`]).
//!
//! ```rust
//! use icfp_lambda::{evaluate, Value};
//!
//! // (λx. λy. x + y) 3 4
//! let value = evaluate("B$ B$ L# L$ B+ v# v$ I$ I%").unwrap();
//! assert_eq!(value, Value::from(7i64));
//! ```

pub mod assembler;
pub mod ast;
pub mod codec;
pub mod evaluator;
pub mod model;
pub mod parser;

pub mod engine;
pub mod error;

pub use assembler::assemble;
pub use ast::{ExpressionNode, NodeRef};
pub use engine::LambdaEngine;
pub use error::{LambdaError, Result};
pub use evaluator::{EngineConfig, EvaluationError, EvaluationStats, Evaluator};
pub use model::{BodyString, Value};
pub use parser::{ParseError, parse_expression};

/// Parse source text into a tree with default settings
pub fn parse(source: &str) -> Result<NodeRef> {
    Ok(parse_expression(source)?)
}

/// Parse and evaluate source text with default settings
pub fn evaluate(source: &str) -> Result<Value> {
    let tree = parse(source)?;
    Ok(Evaluator::new().evaluate(&tree)?)
}
