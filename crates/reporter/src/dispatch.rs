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

//! Sequencing of reporter operations around the events of a session.

use alloy_primitives::{Bytes, TxHash};
use tracelog_common::types::{ExecutionError, GatherTracesResult, MineBlockResult, ReporterEvent};
use tracing::{debug, trace, warn};

use crate::{
    error::Result, projection::assert_codes_match_results, BlockLogOptions, OutputSink,
    TraceReporter,
};

impl<S: OutputSink> TraceReporter<S> {
    /// Apply one session event.
    ///
    /// While buffered logging is disabled only `console.log` output reaches
    /// the sink; everything else is skipped.
    ///
    /// # Panics
    ///
    /// Panics if the deployed codes of a block do not line up with its results.
    pub fn handle_event(&mut self, event: &ReporterEvent) -> Result<()> {
        trace!(event = event.kind(), enabled = self.is_enabled(), "Handling reporter event");

        match event {
            ReporterEvent::SetEnabled { enabled } => {
                self.set_enabled(*enabled);
                Ok(())
            }
            _ if !self.is_enabled() => self.deliver_console_logs(event),
            ReporterEvent::Method { method } => self.finish_method(method),
            ReporterEvent::FailedMethod { method, error, invalid_chain_id } => {
                self.fail_method(method, error, *invalid_chain_id)
            }
            ReporterEvent::UnsupportedMethod { method } => self.print_method_not_supported(method),
            ReporterEvent::InternalError { error } => {
                if error.as_solidity().is_none() {
                    self.print_error_message(&error.to_string())?;
                }
                self.print_unknown_error(error)
            }
            ReporterEvent::MinedBlock { result, codes } => self.log_mined_block(result, codes),
            ReporterEvent::IntervalMinedBlock { result, codes } => {
                self.report_interval_mined_block(result, codes)
            }
            ReporterEvent::SendTransaction { hash, results, codes } => {
                self.log_sent_transaction(*hash, results, codes)
            }
            ReporterEvent::Call { params, code, trace, console_log_messages, error } => self
                .log_call_trace(params, code, trace.as_ref(), console_log_messages, error.as_ref()),
            ReporterEvent::EstimateGasFailure {
                params,
                code,
                trace,
                console_log_messages,
                error,
            } => self.log_estimate_gas_trace(
                params,
                code,
                trace.as_ref(),
                console_log_messages,
                error,
            ),
            ReporterEvent::NewFilter { filter } => {
                self.log_with_title("Filter", filter.describe());
                Ok(())
            }
            ReporterEvent::Message { text } => {
                self.log(text);
                Ok(())
            }
        }
    }

    /// Apply every event in order, stopping at the first sink failure
    pub fn replay<'a>(&mut self, events: impl IntoIterator<Item = &'a ReporterEvent>) -> Result<()> {
        events.into_iter().try_for_each(|event| self.handle_event(event))
    }

    fn finish_method(&mut self, method: &str) -> Result<()> {
        self.print_method(method)?;
        if self.print_logs()? {
            self.print_empty_line()?;
        }
        Ok(())
    }

    fn fail_method(
        &mut self,
        method: &str,
        error: &ExecutionError,
        invalid_chain_id: bool,
    ) -> Result<()> {
        self.print_failed_method(method)?;
        self.print_logs()?;

        // Solidity errors were already buffered with the trace that raised them
        if error.as_solidity().is_none() {
            self.print_empty_line()?;
            self.print_error_message(&error.to_string())?;

            if invalid_chain_id {
                self.print_metamask_warning()?;
            }
        }

        self.print_empty_line()
    }

    fn report_interval_mined_block(&mut self, result: &MineBlockResult, codes: &[Bytes]) -> Result<()> {
        let block = &result.block;
        self.print_mined_block_number(block.number(), block.is_empty())?;

        if !block.is_empty() {
            self.log_interval_mined_block(result, codes)?;
            self.print_logs()?;
            self.print_empty_line()?;
        }
        Ok(())
    }

    fn log_sent_transaction(
        &mut self,
        hash: TxHash,
        results: &[MineBlockResult],
        codes: &[Vec<Bytes>],
    ) -> Result<()> {
        assert_eq!(
            results.len(),
            codes.len(),
            "The array of codes should have the same length as the array of results"
        );

        let [single] = results else {
            return self.log_sent_transaction_with_others(hash, results, codes);
        };

        assert_codes_match_results(single, &codes[0]);

        match (
            single.block.transactions.as_slice(),
            single.results.as_slice(),
            single.traces.as_slice(),
            codes[0].as_slice(),
        ) {
            ([tx], [tx_result], [trace], [code]) => {
                self.log_single_transaction(tx, &single.block, tx_result.gas_used, trace, code)
            }
            _ => self.log_sent_transaction_with_others(hash, results, codes),
        }
    }

    fn log_sent_transaction_with_others(
        &mut self,
        hash: TxHash,
        results: &[MineBlockResult],
        codes: &[Vec<Bytes>],
    ) -> Result<()> {
        if results.is_empty() {
            debug!(%hash, "Sent transaction was not mined into any block");
            return Ok(());
        }

        if results.len() > 1 {
            self.log_multiple_blocks_warning();
        } else {
            self.log_multiple_transactions_warning();
        }

        let options = BlockLogOptions {
            print_block_number: true,
            tx_hash_to_highlight: Some(hash),
            ..Default::default()
        };
        for (index, (result, block_codes)) in results.iter().zip(codes).enumerate() {
            self.log_block(result, block_codes, options)?;
            if index + 1 < results.len() {
                self.log_empty_line();
            }
        }

        let sent = results.iter().zip(codes).find_map(|(result, block_codes)| {
            let index = result.block.transactions.iter().position(|tx| tx.hash == hash)?;
            Some((result, block_codes, index))
        });
        let Some((result, block_codes, index)) = sent else {
            warn!(%hash, "Sent transaction is missing from the mined blocks");
            return Ok(());
        };

        let trace = result.traces.get(index).cloned().unwrap_or_default();
        let gas_used = result.results.get(index).map_or(0, |r| r.gas_used);
        let code = match block_codes.get(index) {
            Some(code) => &code[..],
            None => &[],
        };

        self.log_empty_line();
        self.log_currently_sent_transaction(
            &result.block.transactions[index],
            gas_used,
            &trace,
            code,
            &result.block,
        )
    }

    fn deliver_console_logs(&mut self, event: &ReporterEvent) -> Result<()> {
        let traces: Vec<&GatherTracesResult> = match event {
            ReporterEvent::MinedBlock { result, .. }
            | ReporterEvent::IntervalMinedBlock { result, .. } => result.traces.iter().collect(),
            ReporterEvent::SendTransaction { results, .. } => {
                results.iter().flat_map(|r| &r.traces).collect()
            }
            ReporterEvent::Call { console_log_messages, .. }
            | ReporterEvent::EstimateGasFailure { console_log_messages, .. } => {
                return self.log_console_log_messages(console_log_messages);
            }
            _ => {
                trace!(event = event.kind(), "Buffered logging disabled, skipping event");
                return Ok(());
            }
        };

        for trace in traces {
            self.log_console_log_messages(&trace.console_log_messages)?;
        }
        Ok(())
    }
}
