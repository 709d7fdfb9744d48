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

//! Operator definitions

use std::fmt;

/// Unary operators (`U` tokens)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Integer negation (`-`)
    Negate,
    /// Boolean not (`!`)
    Not,
    /// Reinterpret a string's body bytes as base-94 digits (`#`)
    StringToInt,
    /// Base-94 digits of an integer as a string (`$`)
    IntToString,
}

impl UnaryOperator {
    /// Decode an operator from its token payload byte
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'-' => Some(Self::Negate),
            b'!' => Some(Self::Not),
            b'#' => Some(Self::StringToInt),
            b'$' => Some(Self::IntToString),
            _ => None,
        }
    }

    /// Token payload byte
    pub const fn symbol(self) -> char {
        match self {
            Self::Negate => '-',
            Self::Not => '!',
            Self::StringToInt => '#',
            Self::IntToString => '$',
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Negate => "neg",
            Self::Not => "not",
            Self::StringToInt => "str->int",
            Self::IntToString => "int->str",
        };
        write!(f, "{name}")
    }
}

/// Binary operators (`B` tokens)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Integer addition (`+`)
    Add,
    /// Integer subtraction (`-`)
    Subtract,
    /// Integer multiplication (`*`)
    Multiply,
    /// Integer division truncating toward zero (`/`)
    Divide,
    /// Remainder of truncating division (`%`)
    Modulo,
    /// Integer less-than (`<`)
    LessThan,
    /// Integer greater-than (`>`)
    GreaterThan,
    /// Equality of two same-variant values (`=`)
    Equal,
    /// Boolean or (`|`)
    Or,
    /// Boolean and (`&`)
    And,
    /// String concatenation (`.`)
    Concat,
    /// First `x` characters of a string (`T`)
    Take,
    /// String without its first `x` characters (`D`)
    Drop,
    /// Function application (`$`)
    Apply,
}

impl BinaryOperator {
    /// Decode an operator from its token payload byte
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Self::Add),
            b'-' => Some(Self::Subtract),
            b'*' => Some(Self::Multiply),
            b'/' => Some(Self::Divide),
            b'%' => Some(Self::Modulo),
            b'<' => Some(Self::LessThan),
            b'>' => Some(Self::GreaterThan),
            b'=' => Some(Self::Equal),
            b'|' => Some(Self::Or),
            b'&' => Some(Self::And),
            b'.' => Some(Self::Concat),
            b'T' => Some(Self::Take),
            b'D' => Some(Self::Drop),
            b'$' => Some(Self::Apply),
            _ => None,
        }
    }

    /// Token payload byte
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Modulo => '%',
            Self::LessThan => '<',
            Self::GreaterThan => '>',
            Self::Equal => '=',
            Self::Or => '|',
            Self::And => '&',
            Self::Concat => '.',
            Self::Take => 'T',
            Self::Drop => 'D',
            Self::Apply => '$',
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concat => write!(f, "concat"),
            Self::Take => write!(f, "take"),
            Self::Drop => write!(f, "drop"),
            Self::Apply => write!(f, "apply"),
            other => write!(f, "{}", other.symbol()),
        }
    }
}
