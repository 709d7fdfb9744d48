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

//! Engine configuration
//!
//! This module provides the settings shared by the parser, the evaluator and
//! the [`LambdaEngine`](crate::LambdaEngine) parse cache.

use crate::parser::ParseOptions;

/// Engine configuration for parsing and evaluation
///
/// # Examples
///
/// ```rust
/// use icfp_lambda::evaluator::EngineConfig;
///
/// // Use default configuration
/// let config = EngineConfig::default();
/// assert!(config.rewrite_combinators);
///
/// // Or use builder pattern methods
/// let config = EngineConfig::new()
///     .with_strict_tokens(true)
///     .with_cache_size(64);
/// assert_eq!(config.max_cache_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rewrite literal Y-combinator applications before tokenizing
    ///
    /// The rewrite produces an equivalent program, so results do not depend
    /// on this setting. Default: true
    pub rewrite_combinators: bool,

    /// Treat malformed tokens as parse errors
    ///
    /// When disabled, malformed tokens parse as `Undefined` and a warning is
    /// logged. Default: false
    pub strict_tokens: bool,

    /// Memoize values of closed subtrees on the nodes themselves
    ///
    /// A closed subtree has no free variables, so its value is the same under
    /// every environment. Closure values are not recorded, since they carry
    /// the bindings of the site that built them. Default: true
    pub enable_node_cache: bool,

    /// Maximum number of parsed programs kept by the engine
    ///
    /// The cache is cleared when the limit is reached. Default: 1000
    pub max_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rewrite_combinators: true,
            strict_tokens: false,
            enable_node_cache: true,
            max_cache_size: 1000,
        }
    }
}

impl EngineConfig {
    /// Create new configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the fixed-point combinator rewrite
    pub fn with_combinator_rewrite(mut self, enabled: bool) -> Self {
        self.rewrite_combinators = enabled;
        self
    }

    /// Enable or disable strict token checking
    pub fn with_strict_tokens(mut self, enabled: bool) -> Self {
        self.strict_tokens = enabled;
        self
    }

    /// Enable or disable node memoization
    pub fn with_node_cache(mut self, enabled: bool) -> Self {
        self.enable_node_cache = enabled;
        self
    }

    /// Set maximum parse cache size
    ///
    /// # Arguments
    /// * `size` - Maximum number of cached programs
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }

    /// Parser settings derived from this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            rewrite_combinators: self.rewrite_combinators,
            strict_tokens: self.strict_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.rewrite_combinators);
        assert!(!config.strict_tokens);
        assert!(config.enable_node_cache);
        assert_eq!(config.max_cache_size, 1000);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_combinator_rewrite(false)
            .with_strict_tokens(true)
            .with_node_cache(false)
            .with_cache_size(8);

        assert_eq!(
            config.parse_options(),
            ParseOptions {
                rewrite_combinators: false,
                strict_tokens: true,
            }
        );
        assert!(!config.enable_node_cache);
        assert_eq!(config.max_cache_size, 8);
    }
}
