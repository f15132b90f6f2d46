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

//! Projection of blocks, transactions and calls onto report lines.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use itertools::izip;
use tracelog_common::{
    types::{
        Block, CallParams, ExecutionError, GatherTracesResult, MessageTrace, MineBlockResult,
        Transaction, UNRECOGNIZED_CONTRACT_NAME, UNRECOGNIZED_FUNCTION_NAME,
    },
    wei_to_human_readable,
};

use crate::{error::Result, OutputSink, Paint, TraceReporter};

/// How [`TraceReporter::log_block`] lays out a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockLogOptions {
    /// Start with `Block #n: hash`
    pub print_block_number: bool,
    /// Start with `Block: hash`
    pub print_block_hash: bool,
    /// Add a `Block #n` line to every transaction
    pub print_tx_block_number: bool,
    /// Transaction whose hash is printed in bold
    pub tx_hash_to_highlight: Option<TxHash>,
    /// Print the transaction hash before the contract and function names
    pub start_with_tx_hash: bool,
    /// Indent transaction details below the hash
    pub indent_after_transaction_hash: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct TxTraceOptions {
    highlight_tx_hash: bool,
    start_with_tx_hash: bool,
    print_tx_block_number: bool,
    indent_after_transaction_hash: bool,
}

impl TxTraceOptions {
    const BLOCK_MEMBER: Self = Self {
        highlight_tx_hash: false,
        start_with_tx_hash: true,
        print_tx_block_number: false,
        indent_after_transaction_hash: true,
    };
}

/// Per-transaction arrays of a mined block must line up with its transactions
pub(crate) fn assert_codes_match_results(result: &MineBlockResult, codes: &[Bytes]) {
    assert_eq!(
        result.results.len(),
        codes.len(),
        "The array of codes should have the same length as the array of results"
    );
    assert_eq!(
        result.block.transactions.len(),
        result.results.len(),
        "The array of results should have the same length as the block transactions"
    );
    assert_eq!(
        result.block.transactions.len(),
        result.traces.len(),
        "The array of traces should have the same length as the block transactions"
    );
}

impl<S: OutputSink> TraceReporter<S> {
    /// Buffer an automatically mined block.
    ///
    /// # Panics
    ///
    /// Panics if `codes` and `result.results` differ in length.
    pub fn log_block(
        &mut self,
        result: &MineBlockResult,
        codes: &[Bytes],
        options: BlockLogOptions,
    ) -> Result<()> {
        assert_codes_match_results(result, codes);
        let block = &result.block;

        self.with_indent(|reporter| -> Result<()> {
            if options.print_block_number {
                reporter.log_block_number(block);
            }
            if options.print_block_hash {
                reporter.log_block_hash(block);
            }

            let indent_transactions = options.print_block_number || options.print_block_hash;
            reporter.with_indent_if(indent_transactions, |reporter| -> Result<()> {
                let total = block.transactions.len();
                for (index, (tx, tx_result, trace, code)) in
                    izip!(&block.transactions, &result.results, &result.traces, codes).enumerate()
                {
                    let highlight_tx_hash = options.tx_hash_to_highlight == Some(tx.hash);
                    reporter.log_tx_trace(
                        tx,
                        trace,
                        code,
                        block,
                        tx_result.gas_used,
                        TxTraceOptions {
                            highlight_tx_hash,
                            start_with_tx_hash: options.start_with_tx_hash,
                            print_tx_block_number: options.print_tx_block_number,
                            indent_after_transaction_hash: options.indent_after_transaction_hash,
                        },
                    )?;

                    reporter.log_empty_line_between_transactions(index, total);
                }
                Ok(())
            })
        })
    }

    /// Buffer the only transaction of an automatically mined block
    pub fn log_single_transaction(
        &mut self,
        tx: &Transaction,
        block: &Block,
        gas_used: u64,
        trace: &GatherTracesResult,
        code: &[u8],
    ) -> Result<()> {
        self.with_indent(|reporter| {
            reporter.log_tx_trace(
                tx,
                trace,
                code,
                block,
                gas_used,
                TxTraceOptions { print_tx_block_number: true, ..Default::default() },
            )
        })
    }

    /// Buffer a block mined on request (`evm_mine`).
    ///
    /// # Panics
    ///
    /// Panics if `codes` and `result.results` differ in length.
    pub fn log_mined_block(&mut self, result: &MineBlockResult, codes: &[Bytes]) -> Result<()> {
        assert_codes_match_results(result, codes);
        let block = &result.block;

        self.with_indent(|reporter| -> Result<()> {
            reporter.log_mined_block_number(block.number(), block.is_empty());
            if block.is_empty() {
                return Ok(());
            }

            reporter.with_indent(|reporter| {
                reporter.log_block_hash(block);
                reporter.with_indent(|reporter| reporter.log_block_transactions(result, codes))
            })
        })
    }

    /// Buffer the transactions of a block mined by the interval miner.
    ///
    /// # Panics
    ///
    /// Panics if `codes` and `result.results` differ in length.
    pub fn log_interval_mined_block(
        &mut self,
        result: &MineBlockResult,
        codes: &[Bytes],
    ) -> Result<()> {
        assert_codes_match_results(result, codes);

        self.with_indent(|reporter| {
            reporter.log_block_hash(&result.block);
            reporter.with_indent(|reporter| reporter.log_block_transactions(result, codes))
        })
    }

    fn log_block_transactions(&mut self, result: &MineBlockResult, codes: &[Bytes]) -> Result<()> {
        let block = &result.block;
        let total = block.transactions.len();

        for (index, (tx, tx_result, trace, code)) in
            izip!(&block.transactions, &result.results, &result.traces, codes).enumerate()
        {
            self.log_tx_trace(
                tx,
                trace,
                code,
                block,
                tx_result.gas_used,
                TxTraceOptions::BLOCK_MEMBER,
            )?;
            self.log_empty_line_between_transactions(index, total);
        }

        Ok(())
    }

    /// Buffer the transaction that was sent, after the other transactions mined with it
    pub fn log_currently_sent_transaction(
        &mut self,
        tx: &Transaction,
        gas_used: u64,
        trace: &GatherTracesResult,
        code: &[u8],
        block: &Block,
    ) -> Result<()> {
        self.with_indent(|reporter| -> Result<()> {
            reporter.log("Currently sent transaction:");
            reporter.log_empty_line();

            reporter.log_contract_and_function_name(trace.trace.as_ref(), code, false);

            reporter.log_with_title("Transaction", format!("{:#x}", tx.hash));
            reporter.log_tx_from(tx.from);
            reporter.log_tx_to(tx.to, trace.trace.as_ref());
            reporter.log_tx_value(tx.value);
            reporter.log_with_title("Gas used", format!("{gas_used} of {}", tx.gas_limit));
            reporter.log_with_title(format!("Block #{}", block.number()), format!("{:#x}", block.hash()));

            reporter.log_console_log_messages(&trace.console_log_messages)?;

            if let Some(error) = &trace.error {
                reporter.log_error(error);
            }
            Ok(())
        })
    }

    /// Buffer a failed gas estimation
    pub fn log_estimate_gas_trace(
        &mut self,
        params: &CallParams,
        code: &[u8],
        trace: Option<&MessageTrace>,
        console_log_messages: &[String],
        error: &ExecutionError,
    ) -> Result<()> {
        let warn = self.warn_on_non_contract_calls;
        self.with_indent(|reporter| -> Result<()> {
            reporter.log_contract_and_function_name(trace, code, warn);

            reporter.log_tx_from(params.from);
            reporter.log_tx_to(params.to, trace);
            reporter.log_tx_value(params.value);

            reporter.log_console_log_messages(console_log_messages)?;

            reporter.log_error(error);
            Ok(())
        })
    }

    /// Buffer an `eth_call`
    pub fn log_call_trace(
        &mut self,
        params: &CallParams,
        code: &[u8],
        trace: Option<&MessageTrace>,
        console_log_messages: &[String],
        error: Option<&ExecutionError>,
    ) -> Result<()> {
        let warn = self.warn_on_non_contract_calls;
        self.with_indent(|reporter| -> Result<()> {
            reporter.log_contract_and_function_name(trace, code, warn);

            reporter.log_tx_from(params.from);
            reporter.log_tx_to(params.to, trace);
            if params.value > U256::ZERO {
                reporter.log_tx_value(params.value);
            }

            reporter.log_console_log_messages(console_log_messages)?;

            if let Some(error) = error {
                reporter.log_error(error);
            }
            Ok(())
        })
    }

    fn log_tx_trace(
        &mut self,
        tx: &Transaction,
        trace: &GatherTracesResult,
        code: &[u8],
        block: &Block,
        gas_used: u64,
        options: TxTraceOptions,
    ) -> Result<()> {
        if !options.start_with_tx_hash {
            self.log_contract_and_function_name(trace.trace.as_ref(), code, false);
        }

        let tx_hash = format!("{:#x}", tx.hash);
        let tx_hash = if options.highlight_tx_hash {
            Paint::Emphasis.apply(&tx_hash, self.color)
        } else {
            tx_hash
        };
        self.log_with_title("Transaction", tx_hash);

        self.with_indent_if(options.indent_after_transaction_hash, |reporter| -> Result<()> {
            if options.start_with_tx_hash {
                reporter.log_contract_and_function_name(trace.trace.as_ref(), code, false);
            }
            reporter.log_tx_from(tx.from);
            reporter.log_tx_to(tx.to, trace.trace.as_ref());
            reporter.log_tx_value(tx.value);
            reporter.log_with_title("Gas used", format!("{gas_used} of {}", tx.gas_limit));

            if options.print_tx_block_number {
                reporter.log_with_title(
                    format!("Block #{}", block.number()),
                    format!("{:#x}", block.hash()),
                );
            }

            reporter.log_console_log_messages(&trace.console_log_messages)?;

            if let Some(error) = &trace.error {
                reporter.log_error(error);
            }
            Ok(())
        })
    }

    /// Buffer which contract and function a trace resolved to.
    ///
    /// Calls to an account without code are skipped, with a warning when
    /// `print_non_contract_called` is set.
    pub fn log_contract_and_function_name(
        &mut self,
        trace: Option<&MessageTrace>,
        code: &[u8],
        print_non_contract_called: bool,
    ) {
        let Some(trace) = trace else {
            return;
        };

        match trace {
            MessageTrace::Precompile(precompile) => {
                self.log_with_title(
                    "Precompile call",
                    format!("<PrecompileContract {}>", precompile.precompile),
                );
            }
            MessageTrace::Create(create) => {
                let name = create.contract.as_ref().map_or(UNRECOGNIZED_CONTRACT_NAME, |c| c.name.as_str());
                self.log_with_title("Contract deployment", name);

                if let (Some(address), false) = (create.deployed_contract, create.failed) {
                    self.log_with_title("Contract address", format!("{address:#x}"));
                }
            }
            MessageTrace::Call(call) => {
                if code.is_empty() {
                    if print_non_contract_called {
                        self.log("WARNING: Calling an account which is not a contract");
                    }
                    return;
                }

                let Some(contract) = &call.contract else {
                    self.log_with_title("Contract call", UNRECOGNIZED_CONTRACT_NAME);
                    return;
                };

                let function_name = contract
                    .function_for_calldata(&call.calldata)
                    .map_or(UNRECOGNIZED_FUNCTION_NAME, |f| f.display_name());
                self.log_with_title("Contract call", format!("{}#{function_name}", contract.name));
            }
        }
    }

    /// Buffer `console.log` output of a transaction or call.
    ///
    /// These are never dropped: with buffering disabled they are written
    /// through the sink right away, so they stay in order with other output.
    pub fn log_console_log_messages(&mut self, messages: &[String]) -> Result<()> {
        if !self.state.enabled {
            for message in messages {
                self.write_raw(message)?;
            }
            return Ok(());
        }

        if messages.is_empty() {
            return Ok(());
        }

        self.log_empty_line();
        self.log("console.log:");
        for message in messages {
            self.log(format!("  {message}"));
        }

        Ok(())
    }

    /// Buffer `Mined <empty >block #n`
    pub fn log_mined_block_number(&mut self, block_number: u64, is_empty: bool) {
        let empty = if is_empty { "empty " } else { "" };
        self.log(format!("Mined {empty}block #{block_number}"));
    }

    /// Buffer `Block #n: hash`
    pub fn log_block_number(&mut self, block: &Block) {
        self.log(format!("Block #{}: {:#x}", block.number(), block.hash()));
    }

    /// Buffer `Block: hash`
    pub fn log_block_hash(&mut self, block: &Block) {
        self.log(format!("Block: {:#x}", block.hash()));
    }

    /// Buffer the sender
    pub fn log_tx_from(&mut self, from: Address) {
        self.log_with_title("From", format!("{from:#x}"));
    }

    /// Buffer the recipient, unless the trace is a contract creation
    pub fn log_tx_to(&mut self, to: Option<Address>, trace: Option<&MessageTrace>) {
        if trace.is_some_and(MessageTrace::is_create) {
            return;
        }
        if let Some(to) = to {
            self.log_with_title("To", format!("{to:#x}"));
        }
    }

    /// Buffer the transferred value
    pub fn log_tx_value(&mut self, value: U256) {
        self.log_with_title("Value", wei_to_human_readable(value));
    }

    /// Buffer a separator after every transaction but the last
    pub fn log_empty_line_between_transactions(&mut self, index: usize, total: usize) {
        if total > 1 && index + 1 < total {
            self.log_empty_line();
        }
    }

    /// Buffer the warning shown when the sent transaction shared its block
    pub fn log_multiple_transactions_warning(&mut self) {
        self.with_indent(|reporter| {
            reporter.log("There were other pending transactions mined in the same block:");
        });
        self.log_empty_line();
    }

    /// Buffer the warning shown when several blocks were mined for one transaction
    pub fn log_multiple_blocks_warning(&mut self) {
        self.with_indent(|reporter| {
            reporter.log(
                "There were other pending transactions. More than one block had to be mined:",
            );
        });
        self.log_empty_line();
    }
}
