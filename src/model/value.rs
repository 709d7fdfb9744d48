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

//! Core value types produced by evaluation

use num_bigint::BigInt;
use std::fmt;

use super::body_string::BodyString;
use crate::ast::{NodeRef, VariableId};
use crate::codec::CodecResult;
use crate::evaluator::Environment;

/// Result of forcing an expression
///
/// Atoms evaluate to themselves; a lambda evaluates to a [`Closure`].
/// `Undefined` stands for malformed tokens, missing operands and unbound
/// variables, and never satisfies an operator's type requirement.
#[derive(Clone)]
pub enum Value {
    /// Boolean value
    Boolean(bool),

    /// Arbitrary-precision signed integer
    Integer(BigInt),

    /// String in body-alphabet form
    String(BodyString),

    /// Lambda paired with the environment it was created in
    Closure(Closure),

    /// Absent or malformed value
    Undefined,
}

/// Lambda body with its captured bindings
#[derive(Clone)]
pub struct Closure {
    /// Variable bound on application
    pub parameter: VariableId,
    /// Lambda body, evaluated on application
    pub body: NodeRef,
    /// Bindings visible when the lambda was evaluated
    pub environment: Environment,
}

impl Value {
    /// Build a string value from human text
    pub fn string_from_human(text: &str) -> CodecResult<Self> {
        BodyString::from_human(text).map(Value::String)
    }

    /// Variant name used in type errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::String(_) => "String",
            Value::Closure(_) => "Closure",
            Value::Undefined => "Undefined",
        }
    }

    /// Get the boolean payload, if any
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer payload, if any
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Get the string payload, if any
    pub fn as_string(&self) -> Option<&BodyString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the closure, if any
    pub fn as_closure(&self) -> Option<&Closure> {
        match self {
            Value::Closure(c) => Some(c),
            _ => None,
        }
    }

    /// Check for the undefined sentinel
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
}

/// Closures compare by identity of their body node and parameter; captured
/// environments are not compared.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => {
                a.parameter == b.parameter && std::rc::Rc::ptr_eq(&a.body, &b.body)
            }
            (Value::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(BigInt::from(value))
    }
}

impl From<BodyString> for Value {
    fn from(value: BodyString) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Closure(c) => write!(f, "<closure λ{}>", c.parameter),
            Value::Undefined => write!(f, "<undef>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Integer(i) => write!(f, "Integer({i})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Closure(c) => write!(f, "Closure(λ{} {})", c.parameter, c.body),
            Value::Undefined => write!(f, "Undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-1337i64).to_string(), "-1337");
        assert_eq!(
            Value::string_from_human("Hello World!").unwrap().to_string(),
            "Hello World!"
        );
        assert_eq!(Value::Undefined.to_string(), "<undef>");
    }

    #[test]
    fn test_equality_is_per_variant() {
        assert_eq!(Value::from(3i64), Value::from(3i64));
        assert_ne!(Value::from(1i64), Value::from(true));
        assert_ne!(
            Value::string_from_human("a").unwrap(),
            Value::string_from_human("b").unwrap()
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from(false).type_name(), "Boolean");
        assert_eq!(Value::Undefined.type_name(), "Undefined");
        assert!(Value::Undefined.is_undefined());
        assert_eq!(Value::from(7i64).as_integer(), Some(&BigInt::from(7)));
    }
}
