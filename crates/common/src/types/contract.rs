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

use alloy_json_abi::JsonAbi;
use alloy_primitives::Selector;
use serde::{Deserialize, Serialize};

/// Placeholder name for bytecode that matches no known contract.
pub const UNRECOGNIZED_CONTRACT_NAME: &str = "<UnrecognizedContract>";
/// Placeholder name for a selector that matches no declared function.
pub const UNRECOGNIZED_FUNCTION_NAME: &str = "<unrecognized-selector>";
/// Display name of a fallback function.
pub const FALLBACK_FUNCTION_NAME: &str = "<fallback>";
/// Display name of a receive function.
pub const RECEIVE_FUNCTION_NAME: &str = "<receive>";

/// The kind of a contract function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionKind {
    /// Constructor, only reachable through creation
    Constructor,
    /// Regular external or public function
    Function,
    /// Auto-generated getter of a public state variable
    Getter,
    /// Fallback function
    Fallback,
    /// Receive function
    Receive,
}

/// A function declared by a known contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFunction {
    /// Function name as declared
    pub name: String,
    /// Function kind
    pub kind: FunctionKind,
    /// 4-byte selector, absent for constructors, fallback and receive
    #[serde(default)]
    pub selector: Option<Selector>,
}

impl ContractFunction {
    /// Name shown in reports: declared name, or a placeholder for fallback/receive
    pub fn display_name(&self) -> &str {
        match self.kind {
            FunctionKind::Fallback => FALLBACK_FUNCTION_NAME,
            FunctionKind::Receive => RECEIVE_FUNCTION_NAME,
            _ => &self.name,
        }
    }
}

/// A contract recognized by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Contract name
    pub name: String,
    /// Declared functions
    #[serde(default)]
    pub functions: Vec<ContractFunction>,
}

impl ContractInfo {
    /// Create a contract without any declared function
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), functions: Vec::new() }
    }

    /// Add a declared function, builder style
    pub fn with_function(mut self, function: ContractFunction) -> Self {
        self.functions.push(function);
        self
    }

    /// Build the function table from a JSON ABI.
    pub fn from_abi(name: impl Into<String>, abi: &JsonAbi) -> Self {
        let mut functions: Vec<ContractFunction> = abi
            .functions()
            .map(|function| ContractFunction {
                name: function.name.clone(),
                kind: FunctionKind::Function,
                selector: Some(function.selector()),
            })
            .collect();

        if abi.constructor.is_some() {
            functions.push(ContractFunction {
                name: "constructor".to_string(),
                kind: FunctionKind::Constructor,
                selector: None,
            });
        }
        if abi.fallback.is_some() {
            functions.push(ContractFunction {
                name: "fallback".to_string(),
                kind: FunctionKind::Fallback,
                selector: None,
            });
        }
        if abi.receive.is_some() {
            functions.push(ContractFunction {
                name: "receive".to_string(),
                kind: FunctionKind::Receive,
                selector: None,
            });
        }

        Self { name: name.into(), functions }
    }

    /// Find the function a message with `calldata` dispatches to.
    ///
    /// Empty calldata goes to `receive` when declared, anything that matches no
    /// selector goes to `fallback` when declared.
    pub fn function_for_calldata(&self, calldata: &[u8]) -> Option<&ContractFunction> {
        if let Some(selector) = calldata.get(..4) {
            let found = self
                .functions
                .iter()
                .find(|f| f.selector.is_some_and(|s| s.as_slice() == selector));
            if found.is_some() {
                return found;
            }
        }

        if calldata.is_empty() {
            if let Some(receive) = self.function_of_kind(FunctionKind::Receive) {
                return Some(receive);
            }
        }

        self.function_of_kind(FunctionKind::Fallback)
    }

    fn function_of_kind(&self, kind: FunctionKind) -> Option<&ContractFunction> {
        self.functions.iter().find(|f| f.kind == kind)
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor => write!(f, "constructor"),
            Self::Function => write!(f, "function"),
            Self::Getter => write!(f, "getter"),
            Self::Fallback => write!(f, "fallback"),
            Self::Receive => write!(f, "receive"),
        }
    }
}
