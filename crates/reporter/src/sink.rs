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

//! Output sinks the reporter writes through.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    style::Print,
    terminal::{Clear, ClearType},
    QueueableCommand,
};

/// Destination of printed lines.
pub trait OutputSink {
    /// Append a line
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Overwrite the most recently written line
    fn replace_last_line(&mut self, line: &str) -> io::Result<()>;
}

/// Sink writing to a terminal, using cursor movement to rewrite the last line.
#[derive(Debug)]
pub struct TerminalSink<W: Write = Stdout> {
    out: W,
}

impl TerminalSink<Stdout> {
    /// Sink on the process stdout
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSink<W> {
    /// Sink on an arbitrary writer that understands ANSI escape sequences
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn replace_last_line(&mut self, line: &str) -> io::Result<()> {
        self.out
            .queue(cursor::Hide)?
            .queue(cursor::MoveToPreviousLine(1))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(Print(line))?
            .queue(Print("\n"))?
            .queue(cursor::Show)?;
        self.out.flush()
    }
}

/// A call received by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `write_line`
    WriteLine(String),
    /// `replace_last_line`
    ReplaceLastLine(String),
}

/// Sink that records every call instead of touching a terminal.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

impl RecordingSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call, in order
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Number of appended lines
    pub fn appended(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, SinkCall::WriteLine(_))).count()
    }

    /// Number of in-place rewrites
    pub fn replacements(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, SinkCall::ReplaceLastLine(_))).count()
    }

    /// What a terminal would show after replaying the calls
    pub fn screen(&self) -> Vec<String> {
        let mut screen: Vec<String> = Vec::new();
        for call in &self.calls {
            match call {
                SinkCall::WriteLine(line) => screen.push(line.clone()),
                SinkCall::ReplaceLastLine(line) => match screen.last_mut() {
                    Some(last) => *last = line.clone(),
                    None => screen.push(line.clone()),
                },
            }
        }
        screen
    }

    /// Forget all recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl OutputSink for RecordingSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.calls.push(SinkCall::WriteLine(line.to_string()));
        Ok(())
    }

    fn replace_last_line(&mut self, line: &str) -> io::Result<()> {
        self.calls.push(SinkCall::ReplaceLastLine(line.to_string()));
        Ok(())
    }
}
