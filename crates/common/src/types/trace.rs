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

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use super::{ContractInfo, ExecutionError};

/// Top-level message trace of a transaction or call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageTrace {
    /// Call into a precompiled contract
    Precompile(PrecompileMessageTrace),
    /// Contract creation
    Create(CreateMessageTrace),
    /// Call into an account, with or without code
    Call(CallMessageTrace),
}

impl MessageTrace {
    /// Is this a contract creation trace?
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }

    /// Is this a precompile trace?
    pub fn is_precompile(&self) -> bool {
        matches!(self, Self::Precompile(_))
    }
}

/// Trace of a precompile invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompileMessageTrace {
    /// Numeric identifier of the precompile (its address as an integer)
    pub precompile: u32,
}

/// Trace of a contract creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageTrace {
    /// Recognized contract for the init code, if any
    #[serde(default)]
    pub contract: Option<ContractInfo>,
    /// Address of the deployed contract
    #[serde(default)]
    pub deployed_contract: Option<Address>,
    /// Whether the creation failed
    #[serde(default)]
    pub failed: bool,
}

/// Trace of a message call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMessageTrace {
    /// Recognized contract for the called code, if any
    #[serde(default)]
    pub contract: Option<ContractInfo>,
    /// Call data, the first four bytes being the selector
    #[serde(default)]
    pub calldata: Bytes,
}

/// Trace data gathered while executing a single transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatherTracesResult {
    /// Top-level message trace, if the engine produced one
    #[serde(default)]
    pub trace: Option<MessageTrace>,
    /// Decoded `console.log` messages, in emission order
    #[serde(default)]
    pub console_log_messages: Vec<String>,
    /// Error raised during execution
    #[serde(default)]
    pub error: Option<ExecutionError>,
}
