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

//! Tracelog Common - Shared functionality for tracelog components
//!
//! This crate provides the data shapes handed over by the execution engine
//! (blocks, transactions, message traces, execution errors), the reporter
//! configuration, unit formatting and logging setup.

/// Data types produced by the execution engine and consumed by the reporter
pub mod types;

/// Reporter configuration loaded from TOML files
pub mod config;
/// Logging setup and utilities for consistent logging across tracelog components
pub mod logging;
/// Human-readable rendering of wei amounts
pub mod units;

pub use config::*;
pub use logging::*;
pub use units::*;
