// Tracelog - Ethereum simulation trace reporter
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{UNRECOGNIZED_CONTRACT_NAME, UNRECOGNIZED_FUNCTION_NAME};

/// Error raised while executing a transaction or call.
///
/// Only [`ExecutionError::Solidity`] is a shape the reporter knows how to
/// render; everything else is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExecutionError {
    /// Contract-level revert or failed assertion, with its Solidity stack trace
    #[error(transparent)]
    Solidity(SolidityError),
    /// Any other failure (invalid nonce, out of funds, internal errors...)
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl ExecutionError {
    /// The recognized Solidity error, if this is one
    pub fn as_solidity(&self) -> Option<&SolidityError> {
        match self {
            Self::Solidity(err) => Some(err),
            Self::Other { .. } => None,
        }
    }
}

/// A Solidity revert or assertion failure surfaced from a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidityError {
    /// Error message, e.g. `VM Exception while processing transaction: reverted with reason string 'nope'`
    pub message: String,
    /// Solidity stack trace, innermost frame first
    #[serde(default)]
    pub stack_trace: Vec<StackTraceEntry>,
}

impl SolidityError {
    /// Create an error without stack trace
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), stack_trace: Vec::new() }
    }

    /// Append a stack frame, builder style
    pub fn with_frame(mut self, frame: StackTraceEntry) -> Self {
        self.stack_trace.push(frame);
        self
    }
}

/// One frame of a Solidity stack trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceEntry {
    /// Contract name, `None` for unrecognized code
    #[serde(default)]
    pub contract: Option<String>,
    /// Function name, `None` for unrecognized selectors
    #[serde(default)]
    pub function: Option<String>,
    /// Source file and line, when source maps are available
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

/// Position in a Solidity source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file path
    pub file: String,
    /// 1-based line
    pub line: u32,
}

// Rendered the way a JavaScript stack is dumped: the message, then one
// `at` line per frame.
impl fmt::Display for SolidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.message)?;
        for frame in &self.stack_trace {
            write!(f, "\n    at {frame}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SolidityError {}

impl fmt::Display for StackTraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contract = self.contract.as_deref().unwrap_or(UNRECOGNIZED_CONTRACT_NAME);
        let function = self.function.as_deref().unwrap_or(UNRECOGNIZED_FUNCTION_NAME);
        write!(f, "{contract}.{function}")?;
        match &self.location {
            Some(location) => write!(f, " ({}:{})", location.file, location.line),
            None => write!(f, " (<unknown>)"),
        }
    }
}
