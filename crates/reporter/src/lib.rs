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

//! Tracelog Reporter - terminal output for a simulated chain
//!
//! [`TraceReporter`] turns mined blocks, transactions, calls and errors into
//! indented, column-aligned lines. Lines are either buffered and flushed
//! later, or printed right away; repeated method names and runs of empty
//! blocks are collapsed in place on the terminal.
//!
//! ```
//! use tracelog_reporter::{RecordingSink, TraceReporter};
//!
//! let mut reporter = TraceReporter::new(true, RecordingSink::new());
//! reporter.with_indent(|r| r.log_with_title("From", "0x01"));
//! assert_eq!(reporter.get_logs(), ["  From: 0x01"]);
//! ```

mod dispatch;
mod error;
mod indent;
mod paint;
mod projection;
mod reporter;
mod sink;
mod state;

pub use error::{ReporterError, Result};
pub use indent::{IndentGuard, INDENT_UNIT};
pub use paint::Paint;
pub use projection::BlockLogOptions;
pub use reporter::TraceReporter;
pub use sink::{OutputSink, RecordingSink, SinkCall, TerminalSink};
pub use state::{LogEntry, ReporterState};
