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

//! Lambda engine - the main entry point for evaluating source text

use std::collections::HashMap;

use super::error::Result;
use crate::ast::NodeRef;
use crate::evaluator::{EngineConfig, EvaluationStats, Evaluator};
use crate::model::Value;
use crate::parser::parse_with_options;

/// Engine that parses and evaluates programs in the token format
///
/// Parsed trees are cached by source text. Closed subtrees memoize their
/// values on the tree, so evaluating the same source twice reuses the work of
/// the first run.
#[derive(Debug, Clone)]
pub struct LambdaEngine {
    /// Engine settings
    config: EngineConfig,
    /// The underlying evaluator
    evaluator: Evaluator,
    /// Parsed programs keyed by source text
    expression_cache: HashMap<String, NodeRef>,
}

impl Default for LambdaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LambdaEngine {
    /// Create a new engine with default settings
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom settings
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            evaluator: Evaluator::with_config(&config),
            config,
            expression_cache: HashMap::new(),
        }
    }

    /// Engine settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse source text, using the cache when possible
    pub fn parse(&mut self, source: &str) -> Result<NodeRef> {
        if let Some(tree) = self.expression_cache.get(source) {
            return Ok(tree.clone());
        }

        let tree = parse_with_options(source, self.config.parse_options())?;
        if self.config.max_cache_size == 0 {
            return Ok(tree);
        }
        if self.expression_cache.len() >= self.config.max_cache_size {
            log::debug!(
                "Parse cache full ({} entries), clearing",
                self.expression_cache.len()
            );
            self.expression_cache.clear();
        }
        self.expression_cache
            .insert(source.to_string(), tree.clone());
        Ok(tree)
    }

    /// Evaluate source text to a value
    pub fn evaluate(&mut self, source: &str) -> Result<Value> {
        let tree = self.parse(source)?;
        Ok(self.evaluator.evaluate(&tree)?)
    }

    /// Evaluate source text and report evaluation counters
    pub fn evaluate_with_stats(&mut self, source: &str) -> Result<(Value, EvaluationStats)> {
        let tree = self.parse(source)?;
        Ok(self.evaluator.evaluate_with_stats(&tree)?)
    }

    /// Number of cached programs
    pub fn cache_len(&self) -> usize {
        self.expression_cache.len()
    }

    /// Drop all cached programs
    pub fn clear_cache(&mut self) {
        self.expression_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        let mut engine = LambdaEngine::new();
        assert_eq!(
            engine.evaluate("SB%,,/}Q/2,$_").unwrap().to_string(),
            "Hello World!"
        );
    }

    #[test]
    fn test_cache_reuses_trees_and_values() {
        let mut engine = LambdaEngine::new();
        let source = "B* B+ I# I$ B- I( I#";

        let (first, stats) = engine.evaluate_with_stats(source).unwrap();
        assert_eq!(first, Value::from(25i64));
        assert_eq!(stats.cache_hits, 0);

        let (second, stats) = engine.evaluate_with_stats(source).unwrap();
        assert_eq!(second, first);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(engine.cache_len(), 1);

        engine.clear_cache();
        assert_eq!(engine.cache_len(), 0);
    }

    #[test]
    fn test_cache_is_cleared_when_full() {
        let mut engine = LambdaEngine::with_config(EngineConfig::new().with_cache_size(2));
        engine.evaluate("I!").unwrap();
        engine.evaluate("I\"").unwrap();
        assert_eq!(engine.cache_len(), 2);
        engine.evaluate("I#").unwrap();
        assert_eq!(engine.cache_len(), 1);
    }

    #[test]
    fn test_errors_are_wrapped() {
        let mut engine = LambdaEngine::with_config(EngineConfig::new().with_strict_tokens(true));
        assert!(matches!(
            engine.evaluate("B+ I# ~"),
            Err(crate::LambdaError::Parse(_))
        ));

        let err = engine.evaluate("B+ I# T").unwrap_err();
        assert!(err.is_type_mismatch());
        assert_eq!(err.to_string(), "Type error in '+': expected Integer, got Boolean");
    }
}
