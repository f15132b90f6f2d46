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

//! Line primitives of the reporter: formatting, buffering, printing and
//! the two collapsing behaviors.

use std::fmt;

use tracelog_common::{types::ExecutionError, ReporterConfig};
use tracing::{debug, trace};

use crate::{
    error::Result, IndentGuard, LogEntry, OutputSink, Paint, ReporterState, TerminalSink,
};

/// Side effects and styling of a single emitted line
#[derive(Debug, Clone, Copy)]
struct EmitOptions {
    paint: Option<Paint>,
    stop_collapsing_method: bool,
    stop_collapsing_mined_block: bool,
}

impl EmitOptions {
    const fn plain() -> Self {
        Self { paint: None, stop_collapsing_method: true, stop_collapsing_mined_block: true }
    }

    const fn painted(paint: Paint) -> Self {
        Self { paint: Some(paint), ..Self::plain() }
    }
}

/// Renders simulation events as indented, column-aligned terminal output.
///
/// Lines are either buffered ("log" operations) and retrieved with
/// [`get_logs`](Self::get_logs) / [`print_logs`](Self::print_logs), or written
/// straight to the sink ("print" operations).
pub struct TraceReporter<S: OutputSink = TerminalSink> {
    pub(crate) state: ReporterState,
    sink: S,
    pub(crate) color: bool,
    pub(crate) warn_on_non_contract_calls: bool,
}

impl TraceReporter<TerminalSink> {
    /// Reporter printing to stdout, configured from `config`
    pub fn stdout(config: &ReporterConfig) -> Self {
        Self::from_config(config, TerminalSink::stdout())
    }
}

impl<S: OutputSink> TraceReporter<S> {
    /// Create a reporter with colors off and non-contract warnings on
    pub fn new(enabled: bool, sink: S) -> Self {
        Self {
            state: ReporterState::new(enabled),
            sink,
            color: false,
            warn_on_non_contract_calls: true,
        }
    }

    /// Create a reporter from a configuration
    pub fn from_config(config: &ReporterConfig, sink: S) -> Self {
        Self {
            state: ReporterState::new(config.enabled),
            sink,
            color: config.color.use_color(),
            warn_on_non_contract_calls: config.warn_on_non_contract_calls,
        }
    }

    /// Turn ANSI colors on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether buffered logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Enable or disable buffered logging
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    /// Current session state
    pub fn state(&self) -> &ReporterState {
        &self.state
    }

    /// The output sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The output sink, mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the reporter, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Increase indentation until the returned guard is dropped
    pub fn indent(&mut self, enabled: bool) -> IndentGuard<'_, S> {
        IndentGuard::new(self, enabled)
    }

    /// Run `body` one indentation level deeper
    pub fn with_indent<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        self.with_indent_if(true, body)
    }

    /// Run `body` one indentation level deeper if `enabled`, at the current level otherwise
    pub fn with_indent_if<T>(&mut self, enabled: bool, body: impl FnOnce(&mut Self) -> T) -> T {
        let mut guard = self.indent(enabled);
        body(&mut guard)
    }

    /// Indent every physical line of `message`; empty messages stay empty
    pub fn format(&self, message: &str) -> String {
        if message.is_empty() || self.state.current_indent == 0 {
            return message.to_string();
        }

        let indent = self.state.current_indent;
        message.split('\n').map(|line| format!("{:indent$}{line}", "")).collect::<Vec<_>>().join("\n")
    }

    fn format_with(&self, message: &str, options: EmitOptions) -> String {
        let formatted = self.format(message);
        match options.paint {
            Some(paint) => paint.apply(&formatted, self.color),
            None => formatted,
        }
    }

    fn apply_stop_collapsing(&mut self, options: EmitOptions) {
        if options.stop_collapsing_method {
            self.state.stop_collapsing_method();
        }
        if options.stop_collapsing_mined_block {
            self.state.empty_block_range_start = None;
        }
    }

    fn push_line(&mut self, message: &str, options: EmitOptions) {
        self.apply_stop_collapsing(options);
        let formatted = self.format_with(message, options);
        self.state.entries.push(LogEntry::Plain(formatted));
    }

    fn print_line(&mut self, message: &str, options: EmitOptions) -> Result<()> {
        self.apply_stop_collapsing(options);
        let formatted = self.format_with(message, options);
        self.sink.write_line(&formatted)?;
        Ok(())
    }

    /// Write `line` through the sink verbatim, without indentation.
    ///
    /// It is still a new line on the terminal, so both collapsing runs end here.
    pub(crate) fn write_raw(&mut self, line: &str) -> Result<()> {
        self.apply_stop_collapsing(EmitOptions::plain());
        self.sink.write_line(line)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Buffered output
    // ---------------------------------------------------------------------

    /// Buffer a line at the current indentation
    pub fn log(&mut self, message: impl AsRef<str>) {
        self.push_line(message.as_ref(), EmitOptions::plain());
    }

    /// Buffer a formatted line, e.g. `reporter.debug(format_args!("{x} gas"))`
    pub fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.log(args.to_string());
    }

    /// Buffer a `title: value` line, aligned with every other titled line
    pub fn log_with_title(&mut self, title: impl AsRef<str>, message: impl fmt::Display) {
        self.apply_stop_collapsing(EmitOptions::plain());

        let title = format!("{:indent$}{}", "", title.as_ref(), indent = self.state.current_indent);

        // Never narrow the column, otherwise values jump around between calls
        self.state.title_column_width = self.state.title_column_width.max(title.chars().count());

        self.state.entries.push(LogEntry::Titled { title, value: message.to_string() });
    }

    /// Buffer an empty line
    pub fn log_empty_line(&mut self) {
        self.log("");
    }

    /// Render the buffer without clearing it
    pub fn get_logs(&self) -> Vec<String> {
        let width = self.state.title_column_width;
        self.state.entries.iter().map(|entry| entry.render(width)).collect()
    }

    /// Drop every buffered entry; the title column keeps its width
    pub fn clear_logs(&mut self) {
        self.state.entries.clear();
    }

    /// Whether anything is buffered
    pub fn has_logs(&self) -> bool {
        !self.state.entries.is_empty()
    }

    /// Buffer a recognized execution error; other errors are the caller's business
    pub fn log_error(&mut self, error: &ExecutionError) {
        match error.as_solidity() {
            Some(solidity_error) => {
                self.log_empty_line();
                self.log(solidity_error.to_string());
            }
            None => debug!(%error, "Not logging unrecognized execution error"),
        }
    }

    // ---------------------------------------------------------------------
    // Direct output
    // ---------------------------------------------------------------------

    /// Print a line at the current indentation
    pub fn print(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.print_line(message.as_ref(), EmitOptions::plain())
    }

    /// Print an empty line
    pub fn print_empty_line(&mut self) -> Result<()> {
        self.print("")
    }

    /// Print the buffered lines and clear the buffer. Returns whether anything was printed.
    pub fn print_logs(&mut self) -> Result<bool> {
        let logs = self.get_logs();
        if logs.is_empty() {
            return Ok(false);
        }

        for line in &logs {
            self.print(line)?;
        }
        self.clear_logs();

        Ok(true)
    }

    /// Print the name of a method that just ran.
    ///
    /// Consecutive prints of the same method, with nothing buffered in between,
    /// rewrite the last line as `method (count)` instead of appending.
    pub fn print_method(&mut self, method: &str) -> Result<()> {
        if self.state.is_collapsing(method) {
            self.state.collapsed_count += 1;
            trace!(method, count = self.state.collapsed_count, "Collapsing repeated method");

            let line = format!("{method} ({})", self.state.collapsed_count);
            let line = Paint::Success.apply(&line, self.color);
            self.sink.replace_last_line(&line)?;
            Ok(())
        } else {
            self.state.start_collapsing_method(method);
            self.print_line(
                method,
                EmitOptions { stop_collapsing_method: false, ..EmitOptions::painted(Paint::Success) },
            )
        }
    }

    /// Print the number of a block mined by the interval miner.
    ///
    /// While a run is open, every new block rewrites the last line as
    /// `Mined empty block range #start to #n`. The run stays open as long as
    /// nothing else is emitted, whether or not the new block is empty.
    pub fn print_mined_block_number(&mut self, block_number: u64, is_empty: bool) -> Result<()> {
        if let Some(start) = self.state.empty_block_range_start {
            let line = format!("Mined empty block range #{start} to #{block_number}");
            self.sink.replace_last_line(&line)?;
            Ok(())
        } else {
            self.state.empty_block_range_start = Some(block_number);
            let empty = if is_empty { "empty " } else { "" };
            self.print_line(
                &format!("Mined {empty}block #{block_number}"),
                EmitOptions { stop_collapsing_mined_block: false, ..EmitOptions::plain() },
            )
        }
    }

    /// Print a recognized execution error after an empty line
    pub fn print_error(&mut self, error: &ExecutionError) -> Result<()> {
        match error.as_solidity() {
            Some(solidity_error) => {
                self.print_empty_line()?;
                let message = solidity_error.to_string();
                self.with_indent(|reporter| reporter.print(&message))
            }
            None => {
                debug!(%error, "Not printing unrecognized execution error");
                Ok(())
            }
        }
    }

    /// Print an error message one level deeper
    pub fn print_error_message(&mut self, message: &str) -> Result<()> {
        self.with_indent(|reporter| reporter.print(message))
    }

    /// Print the name of a method that failed
    pub fn print_failed_method(&mut self, method: &str) -> Result<()> {
        self.print_line(method, EmitOptions::painted(Paint::Failure))
    }

    /// Print the name of a method the node does not support
    pub fn print_method_not_supported(&mut self, method: &str) -> Result<()> {
        self.print_line(
            &format!("{method} - Method not supported"),
            EmitOptions::painted(Paint::Failure),
        )
    }

    /// Print a hint for wallets that sign with the wrong chain id
    pub fn print_metamask_warning(&mut self) -> Result<()> {
        self.with_indent(|reporter| {
            reporter.print_line(
                "If you are using MetaMask, make sure the chain id of the selected network matches the node's chain id",
                EmitOptions::painted(Paint::Warning),
            )
        })
    }

    /// Print an error that was not expected at all, followed by a bug report hint
    pub fn print_unknown_error(&mut self, error: &ExecutionError) -> Result<()> {
        self.print_error(error)?;
        self.print_empty_line()?;
        self.with_indent(|reporter| {
            reporter.print(
                "If you think this is a bug in tracelog, please report it here: https://github.com/edb-rs/tracelog/issues",
            )
        })
    }
}

impl<S: OutputSink + fmt::Debug> fmt::Debug for TraceReporter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceReporter")
            .field("state", &self.state)
            .field("sink", &self.sink)
            .field("color", &self.color)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingSink;
    use tracelog_common::types::SolidityError;

    fn reporter() -> TraceReporter<RecordingSink> {
        TraceReporter::new(true, RecordingSink::new())
    }

    #[test]
    fn test_format_indents_every_line() {
        let mut reporter = reporter();
        assert_eq!(reporter.format("a\nb"), "a\nb");

        reporter.with_indent(|r| {
            assert_eq!(r.format("a\nb"), "  a\n  b");
            assert_eq!(r.format(""), "");
            r.with_indent(|r| assert_eq!(r.format("c"), "    c"));
        });
    }

    #[test]
    fn test_indent_restored_after_error() {
        let mut reporter = reporter();
        let result: std::result::Result<(), &str> = reporter.with_indent(|r| {
            r.with_indent(|_| Err::<(), _>("boom"))?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(reporter.state().current_indent(), 0);
    }

    #[test]
    fn test_disabled_indent_is_a_no_op() {
        let mut reporter = reporter();
        reporter.with_indent_if(false, |r| assert_eq!(r.state().current_indent(), 0));
        reporter.with_indent_if(true, |r| assert_eq!(r.state().current_indent(), 2));
    }

    #[test]
    fn test_title_width_survives_clear() {
        let mut reporter = reporter();
        reporter.with_indent(|r| r.log_with_title("Contract deployment", "Foo"));
        assert_eq!(reporter.state().title_column_width(), 21);

        reporter.clear_logs();
        reporter.log_with_title("To", "0x01");
        assert_eq!(reporter.get_logs(), [format!("To:{} 0x01", " ".repeat(19))]);
    }

    #[test]
    fn test_log_stops_collapsing() {
        let mut reporter = reporter();
        reporter.print_method("eth_chainId").unwrap();
        reporter.log("something");
        assert_eq!(reporter.state().collapsed_method(), None);

        reporter.print_mined_block_number(1, true).unwrap();
        assert_eq!(reporter.state().empty_block_range_start(), Some(1));
        reporter.log("other");
        assert_eq!(reporter.state().empty_block_range_start(), None);
    }

    #[test]
    fn test_titled_log_stops_collapsing() {
        let mut reporter = reporter();
        reporter.print_mined_block_number(3, true).unwrap();
        reporter.log_with_title("From", "0x01");
        assert_eq!(reporter.state().empty_block_range_start(), None);
    }

    #[test]
    fn test_print_logs_flushes_buffer() {
        let mut reporter = reporter();
        assert!(!reporter.print_logs().unwrap());

        reporter.log("first");
        reporter.with_indent(|r| r.log_with_title("Value", "0 ETH"));
        assert!(reporter.print_logs().unwrap());
        assert!(!reporter.has_logs());
        assert_eq!(reporter.sink().screen(), ["first", "  Value: 0 ETH"]);
    }

    #[test]
    fn test_print_error_only_renders_solidity_errors() {
        let mut reporter = reporter();
        reporter.print_error(&ExecutionError::Other { message: "nonce too low".into() }).unwrap();
        assert!(reporter.sink().calls().is_empty());

        reporter.print_error(&ExecutionError::Solidity(SolidityError::new("reverted"))).unwrap();
        assert_eq!(reporter.sink().screen(), ["", "  Error: reverted"]);
    }

    #[test]
    fn test_method_not_supported() {
        let mut reporter = reporter();
        reporter.print_method_not_supported("eth_mining").unwrap();
        assert_eq!(reporter.sink().screen(), ["eth_mining - Method not supported"]);
    }
}
