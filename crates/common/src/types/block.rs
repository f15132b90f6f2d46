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

use alloy_primitives::{Address, TxHash, B256, U256};
use serde::{Deserialize, Serialize};

use super::GatherTracesResult;

/// Header fields of a mined block that show up in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block number
    pub number: u64,
    /// Block hash
    pub hash: B256,
}

/// A signed transaction as included in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash
    pub hash: TxHash,
    /// Recovered sender
    pub from: Address,
    /// Recipient, `None` for contract creation
    #[serde(default)]
    pub to: Option<Address>,
    /// Value transferred in wei
    #[serde(default)]
    pub value: U256,
    /// Gas limit set by the sender
    pub gas_limit: u64,
}

/// A mined block with its transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header
    pub header: BlockHeader,
    /// Transactions in inclusion order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Block number from the header
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Block hash from the header
    pub fn hash(&self) -> B256 {
        self.header.hash
    }

    /// Whether the block contains no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Execution outcome of a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// Gas consumed by the transaction
    pub gas_used: u64,
}

/// Everything the engine reports after mining a block.
///
/// `results` and `traces` run parallel to `block.transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineBlockResult {
    /// The mined block
    pub block: Block,
    /// Per-transaction execution results
    #[serde(default)]
    pub results: Vec<TransactionResult>,
    /// Per-transaction traces
    #[serde(default)]
    pub traces: Vec<GatherTracesResult>,
}

/// Parameters of an `eth_call` or `eth_estimateGas` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallParams {
    /// Sender
    pub from: Address,
    /// Recipient, `None` for a creation
    #[serde(default)]
    pub to: Option<Address>,
    /// Value sent along with the call
    #[serde(default)]
    pub value: U256,
    /// Gas limit for the call
    #[serde(default)]
    pub gas_limit: Option<u64>,
}
