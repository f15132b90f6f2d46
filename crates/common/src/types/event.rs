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

use alloy_primitives::{Bytes, TxHash};
use serde::{Deserialize, Serialize};

use super::{CallParams, ExecutionError, FilterRequest, MessageTrace, MineBlockResult};

/// One step of a simulation session, as recorded by the node driving the reporter.
///
/// Events are replayed in order. Events that only buffer lines (blocks, calls,
/// sent transactions) are flushed by the next method event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ReporterEvent {
    /// An RPC method completed successfully
    Method {
        /// Method name
        method: String,
    },
    /// An RPC method failed
    #[serde(rename_all = "camelCase")]
    FailedMethod {
        /// Method name
        method: String,
        /// The failure
        error: ExecutionError,
        /// The failure is a chain id mismatch of a signed transaction
        #[serde(default)]
        invalid_chain_id: bool,
    },
    /// An RPC method the node does not implement
    UnsupportedMethod {
        /// Method name
        method: String,
    },
    /// An error nobody expected
    InternalError {
        /// The failure
        error: ExecutionError,
    },
    /// A block mined on request (`evm_mine`)
    MinedBlock {
        /// Mining result
        result: MineBlockResult,
        /// Deployed code per transaction
        #[serde(default)]
        codes: Vec<Bytes>,
    },
    /// A block mined by the interval miner
    IntervalMinedBlock {
        /// Mining result
        result: MineBlockResult,
        /// Deployed code per transaction
        #[serde(default)]
        codes: Vec<Bytes>,
    },
    /// A transaction sent with automining on
    SendTransaction {
        /// Hash of the transaction that was sent
        hash: TxHash,
        /// Every block mined to include it
        results: Vec<MineBlockResult>,
        /// Deployed code per transaction, per block
        #[serde(default)]
        codes: Vec<Vec<Bytes>>,
    },
    /// An `eth_call`
    #[serde(rename_all = "camelCase")]
    Call {
        /// Call parameters
        params: CallParams,
        /// Code at the recipient
        #[serde(default)]
        code: Bytes,
        /// Message trace
        #[serde(default)]
        trace: Option<MessageTrace>,
        /// `console.log` output
        #[serde(default)]
        console_log_messages: Vec<String>,
        /// Error raised by the call
        #[serde(default)]
        error: Option<ExecutionError>,
    },
    /// An `eth_estimateGas` that failed
    #[serde(rename_all = "camelCase")]
    EstimateGasFailure {
        /// Call parameters
        params: CallParams,
        /// Code at the recipient
        #[serde(default)]
        code: Bytes,
        /// Message trace
        #[serde(default)]
        trace: Option<MessageTrace>,
        /// `console.log` output
        #[serde(default)]
        console_log_messages: Vec<String>,
        /// Why estimation failed
        error: ExecutionError,
    },
    /// A log filter was installed
    NewFilter {
        /// Filter parameters
        filter: FilterRequest,
    },
    /// Free-form line
    Message {
        /// Text to log
        text: String,
    },
    /// Toggle buffered logging
    SetEnabled {
        /// New value of the flag
        enabled: bool,
    },
}

impl ReporterEvent {
    /// Short label of the event kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Method { .. } => "method",
            Self::FailedMethod { .. } => "failedMethod",
            Self::UnsupportedMethod { .. } => "unsupportedMethod",
            Self::InternalError { .. } => "internalError",
            Self::MinedBlock { .. } => "minedBlock",
            Self::IntervalMinedBlock { .. } => "intervalMinedBlock",
            Self::SendTransaction { .. } => "sendTransaction",
            Self::Call { .. } => "call",
            Self::EstimateGasFailure { .. } => "estimateGasFailure",
            Self::NewFilter { .. } => "newFilter",
            Self::Message { .. } => "message",
            Self::SetEnabled { .. } => "setEnabled",
        }
    }
}
