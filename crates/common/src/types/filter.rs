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

//! Typed parameters of `eth_newFilter` / `eth_getLogs`.
//!
//! Shape checking happens before these values reach the reporter, so the
//! types only model what a valid request looks like.

use std::fmt;

use alloy_primitives::{Address, B256, U64};
use serde::{Deserialize, Serialize};

/// Named block tags accepted in filter ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTagName {
    /// Genesis block
    Earliest,
    /// Most recent block
    Latest,
    /// Pending block
    Pending,
}

/// A block reference: quantity or named tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTag {
    /// Block number, as a hex quantity
    Number(U64),
    /// Named tag
    Named(BlockTagName),
}

/// Address filter: one address or any of several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogAddress {
    /// Single address
    Single(Address),
    /// Any of the listed addresses
    Any(Vec<Address>),
}

/// Filter for one topic position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicFilter {
    /// Exact topic
    Single(B256),
    /// Any of the listed topics
    Any(Vec<B256>),
}

/// Parameters of a log filter request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Start of the block range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockTag>,
    /// End of the block range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockTag>,
    /// Emitting contract filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<LogAddress>,
    /// Positional topic filters, `null` matching anything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Option<TopicFilter>>>,
    /// Restrict to a single block by hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
}

impl FilterRequest {
    /// One-line summary of the filter, used when logging filter methods
    pub fn describe(&self) -> String {
        if let Some(hash) = self.block_hash {
            return format!("block {hash}{}", self.describe_matchers());
        }

        let from = self.from_block.map_or_else(|| "latest".to_string(), |b| b.to_string());
        let to = self.to_block.map_or_else(|| "latest".to_string(), |b| b.to_string());
        format!("blocks {from}..{to}{}", self.describe_matchers())
    }

    fn describe_matchers(&self) -> String {
        let mut out = String::new();
        match &self.address {
            Some(LogAddress::Single(address)) => out.push_str(&format!(", address {address}")),
            Some(LogAddress::Any(addresses)) => {
                out.push_str(&format!(", {} addresses", addresses.len()))
            }
            None => {}
        }
        if let Some(topics) = &self.topics {
            let constrained = topics.iter().filter(|t| t.is_some()).count();
            out.push_str(&format!(", {constrained} topic filters"));
        }
        out
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "#{number}"),
            Self::Named(BlockTagName::Earliest) => write!(f, "earliest"),
            Self::Named(BlockTagName::Latest) => write!(f, "latest"),
            Self::Named(BlockTagName::Pending) => write!(f, "pending"),
        }
    }
}
