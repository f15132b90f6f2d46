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

use std::ops::{Deref, DerefMut};

use crate::{OutputSink, TraceReporter};

/// Columns added by one indentation level.
pub const INDENT_UNIT: usize = 2;

/// Scoped indentation level.
///
/// Created by [`TraceReporter::indent`]. The reporter is reachable through
/// the guard while it lives, and the indentation is restored when the guard
/// is dropped, including during unwinding.
pub struct IndentGuard<'a, S: OutputSink> {
    reporter: &'a mut TraceReporter<S>,
    added: usize,
}

impl<'a, S: OutputSink> IndentGuard<'a, S> {
    pub(crate) fn new(reporter: &'a mut TraceReporter<S>, enabled: bool) -> Self {
        let added = if enabled { INDENT_UNIT } else { 0 };
        reporter.state.current_indent += added;
        Self { reporter, added }
    }
}

impl<S: OutputSink> Deref for IndentGuard<'_, S> {
    type Target = TraceReporter<S>;

    fn deref(&self) -> &Self::Target {
        self.reporter
    }
}

impl<S: OutputSink> DerefMut for IndentGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.reporter
    }
}

impl<S: OutputSink> Drop for IndentGuard<'_, S> {
    fn drop(&mut self) {
        self.reporter.state.current_indent -= self.added;
    }
}
