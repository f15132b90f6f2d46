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

/// A buffered line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// Already indented line, printed as is
    Plain(String),
    /// Indented title and raw value, aligned on the title column when rendered
    Titled {
        /// Indented title, without the colon
        title: String,
        /// Value shown after the title
        value: String,
    },
}

impl LogEntry {
    /// Render the entry with titles padded to `title_column_width`
    pub fn render(&self, title_column_width: usize) -> String {
        match self {
            Self::Plain(line) => line.clone(),
            Self::Titled { title, value } => {
                let title = format!("{title}:");
                format!("{title:<width$} {value}", width = title_column_width + 1)
            }
        }
    }
}

/// Session state of a reporter.
///
/// Only the reporter mutates it; the accessors exist so that callers and
/// tests can observe it.
#[derive(Debug, Clone, Default)]
pub struct ReporterState {
    pub(crate) enabled: bool,
    pub(crate) entries: Vec<LogEntry>,
    pub(crate) title_column_width: usize,
    pub(crate) current_indent: usize,
    pub(crate) collapsed_method: Option<String>,
    pub(crate) collapsed_count: usize,
    pub(crate) empty_block_range_start: Option<u64>,
}

impl ReporterState {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, ..Default::default() }
    }

    /// Whether buffered logging is enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Buffered entries, oldest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Widest indented title seen so far
    pub fn title_column_width(&self) -> usize {
        self.title_column_width
    }

    /// Current indentation, in columns
    pub fn current_indent(&self) -> usize {
        self.current_indent
    }

    /// Method whose repeated prints are being collapsed
    pub fn collapsed_method(&self) -> Option<&str> {
        self.collapsed_method.as_deref()
    }

    /// How many prints of the collapsed method were absorbed, including the first
    pub fn collapsed_count(&self) -> usize {
        self.collapsed_count
    }

    /// First block of the open run of empty mined blocks
    pub fn empty_block_range_start(&self) -> Option<u64> {
        self.empty_block_range_start
    }

    pub(crate) fn start_collapsing_method(&mut self, method: &str) {
        self.collapsed_method = Some(method.to_string());
        self.collapsed_count = 1;
    }

    pub(crate) fn stop_collapsing_method(&mut self) {
        self.collapsed_method = None;
        self.collapsed_count = 0;
    }

    pub(crate) fn is_collapsing(&self, method: &str) -> bool {
        self.collapsed_method.as_deref() == Some(method)
            && self.entries.is_empty()
            && self.collapsed_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titled_entry_padding() {
        let entry = LogEntry::Titled { title: "  From".to_string(), value: "0xabc".to_string() };
        assert_eq!(entry.render(13), "  From:        0xabc");
        assert_eq!(entry.render(6), "  From: 0xabc");
    }

    #[test]
    fn test_plain_entry_ignores_width() {
        let entry = LogEntry::Plain("  Block: 0x01".to_string());
        assert_eq!(entry.render(40), "  Block: 0x01");
    }

    #[test]
    fn test_collapsing_requires_empty_buffer() {
        let mut state = ReporterState::new(true);
        state.start_collapsing_method("eth_blockNumber");
        assert!(state.is_collapsing("eth_blockNumber"));
        assert!(!state.is_collapsing("eth_chainId"));

        state.entries.push(LogEntry::Plain("x".to_string()));
        assert!(!state.is_collapsing("eth_blockNumber"));

        state.entries.clear();
        state.stop_collapsing_method();
        assert!(!state.is_collapsing("eth_blockNumber"));
    }
}
