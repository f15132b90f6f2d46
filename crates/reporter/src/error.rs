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

use thiserror::Error;

/// Errors that can occur while reporting.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Writing to the output sink failed
    #[error("failed to write to output sink: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for reporter operations
pub type Result<T, E = ReporterError> = std::result::Result<T, E>;
