use std::panic::{catch_unwind, AssertUnwindSafe};

use alloy_primitives::{Address, Bytes, Selector, B256, U256};
use tracelog_common::{
    ensure_test_logging,
    types::{
        Block, BlockHeader, CallMessageTrace, CallParams, ContractFunction, ContractInfo,
        CreateMessageTrace, ExecutionError, FunctionKind, GatherTracesResult, MessageTrace,
        MineBlockResult, PrecompileMessageTrace, ReporterEvent, SolidityError, SourceLocation,
        StackTraceEntry, Transaction, TransactionResult,
    },
};
use tracelog_reporter::{BlockLogOptions, RecordingSink, TraceReporter};
use tracing::info;

const BAR_SELECTOR: [u8; 4] = [0xfe, 0xbb, 0x0f, 0x7e];

fn reporter() -> TraceReporter<RecordingSink> {
    ensure_test_logging(None);
    TraceReporter::new(true, RecordingSink::new())
}

fn foo_contract() -> ContractInfo {
    ContractInfo::new("Foo").with_function(ContractFunction {
        name: "bar".to_string(),
        kind: FunctionKind::Function,
        selector: Some(Selector::from(BAR_SELECTOR)),
    })
}

fn call_to_foo_bar() -> MessageTrace {
    let mut calldata = BAR_SELECTOR.to_vec();
    calldata.extend_from_slice(&[0u8; 32]);
    MessageTrace::Call(CallMessageTrace {
        contract: Some(foo_contract()),
        calldata: Bytes::from(calldata),
    })
}

fn tx(byte: u8) -> Transaction {
    Transaction {
        hash: B256::repeat_byte(byte),
        from: Address::repeat_byte(0xaa),
        to: Some(Address::repeat_byte(0xbb)),
        value: U256::ZERO,
        gas_limit: 30_000,
    }
}

fn mined(number: u64, txs: Vec<Transaction>) -> MineBlockResult {
    let results = txs.iter().map(|_| TransactionResult { gas_used: 21_000 }).collect();
    let traces = txs
        .iter()
        .map(|_| GatherTracesResult { trace: Some(call_to_foo_bar()), ..Default::default() })
        .collect();
    MineBlockResult {
        block: Block {
            header: BlockHeader { number, hash: B256::repeat_byte(0xcc) },
            transactions: txs,
        },
        results,
        traces,
    }
}

fn codes(n: usize) -> Vec<Bytes> {
    vec![Bytes::from_static(&[0x60, 0x80]); n]
}

#[test]
fn test_indent_restored_after_panic() {
    let mut reporter = reporter();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        reporter.with_indent(|r| {
            r.with_indent(|r| {
                r.log("deep");
                panic!("boom");
            })
        })
    }));

    assert!(outcome.is_err());
    assert_eq!(reporter.state().current_indent(), 0);
    reporter.log("top");
    assert_eq!(reporter.get_logs(), ["    deep", "top"]);
}

#[test]
fn test_guard_restores_indent() {
    let mut reporter = reporter();
    {
        let mut guard = reporter.indent(true);
        guard.log("inside");
        assert_eq!(guard.state().current_indent(), 2);
    }
    assert_eq!(reporter.state().current_indent(), 0);
}

#[test]
fn test_titled_values_share_a_column() {
    let mut reporter = reporter();
    reporter.log_with_title("From", "a");
    reporter.with_indent(|r| r.log_with_title("Contract deployment", "b"));
    reporter.log_with_title("To", "c");

    // widest title is "  Contract deployment", 21 columns
    let logs = reporter.get_logs();
    for (line, value) in logs.iter().zip(["a", "b", "c"]) {
        assert_eq!(line.find(value), Some(23), "misaligned: {line:?}");
    }
}

#[test]
fn test_repeated_method_collapses() {
    let mut reporter = reporter();
    for _ in 0..4 {
        reporter.print_method("eth_blockNumber").unwrap();
    }

    let sink = reporter.sink();
    assert_eq!(sink.appended(), 1);
    assert_eq!(sink.replacements(), 3);
    assert_eq!(sink.screen(), ["eth_blockNumber (4)"]);
}

#[test]
fn test_different_method_resets_collapsing() {
    let mut reporter = reporter();
    reporter.print_method("eth_chainId").unwrap();
    reporter.print_method("eth_accounts").unwrap();
    reporter.print_method("eth_chainId").unwrap();

    assert_eq!(reporter.sink().appended(), 3);
    assert_eq!(reporter.sink().replacements(), 0);
}

#[test]
fn test_buffered_line_blocks_method_collapsing() {
    let mut reporter = reporter();
    reporter.print_method("eth_call").unwrap();
    reporter.log("Contract call: Foo#bar");
    reporter.print_method("eth_call").unwrap();

    assert_eq!(reporter.sink().appended(), 2);
}

#[test]
fn test_empty_blocks_collapse_into_range() {
    let mut reporter = reporter();
    for number in 5..=7 {
        reporter.print_mined_block_number(number, true).unwrap();
    }

    let sink = reporter.sink();
    assert_eq!(sink.appended(), 1);
    assert_eq!(sink.replacements(), 2);
    assert_eq!(sink.screen(), ["Mined empty block range #5 to #7"]);
}

#[test]
fn test_print_ends_block_range() {
    let mut reporter = reporter();
    reporter.print_mined_block_number(5, true).unwrap();
    reporter.print("something else").unwrap();
    reporter.print_mined_block_number(6, true).unwrap();

    assert_eq!(
        reporter.sink().screen(),
        ["Mined empty block #5", "something else", "Mined empty block #6"]
    );
}

#[test]
fn test_method_and_block_lines_end_each_others_run() {
    let mut reporter = reporter();
    reporter.print_method("eth_chainId").unwrap();
    reporter.print_mined_block_number(1, true).unwrap();

    // the block line ended the method run
    assert_eq!(reporter.state().collapsed_method(), None);

    reporter.print_method("eth_chainId").unwrap();
    assert_eq!(reporter.state().empty_block_range_start(), None);
    assert_eq!(reporter.sink().appended(), 3);
}

#[test]
fn test_clear_logs() {
    let mut reporter = reporter();
    reporter.log("a");
    reporter.log_with_title("b", "c");
    assert!(reporter.has_logs());

    reporter.clear_logs();
    assert!(reporter.get_logs().is_empty());
    assert!(!reporter.has_logs());

    reporter.clear_logs();
    assert!(!reporter.has_logs());
}

#[test]
fn test_known_contract_call() {
    let mut reporter = reporter();
    reporter.log_contract_and_function_name(Some(&call_to_foo_bar()), &[0x60], false);
    assert_eq!(reporter.get_logs(), ["Contract call: Foo#bar"]);
}

#[test]
fn test_contract_identification_variants() {
    let mut reporter = reporter();
    let unknown_selector = MessageTrace::Call(CallMessageTrace {
        contract: Some(foo_contract()),
        calldata: Bytes::from_static(&[1, 2, 3, 4]),
    });
    let unknown_contract =
        MessageTrace::Call(CallMessageTrace { contract: None, calldata: Bytes::new() });
    let precompile = MessageTrace::Precompile(PrecompileMessageTrace { precompile: 1 });

    reporter.log_contract_and_function_name(Some(&unknown_selector), &[0x60], false);
    reporter.log_contract_and_function_name(Some(&unknown_contract), &[0x60], false);
    reporter.log_contract_and_function_name(Some(&precompile), &[], false);
    reporter.log_contract_and_function_name(None, &[0x60], true);

    assert_eq!(
        reporter.get_logs(),
        [
            "Contract call:   Foo#<unrecognized-selector>",
            "Contract call:   <UnrecognizedContract>",
            "Precompile call: <PrecompileContract 1>",
        ]
    );
}

#[test]
fn test_receive_and_fallback_names() {
    let mut reporter = reporter();
    let contract = ContractInfo::new("Vault")
        .with_function(ContractFunction {
            name: "receive".to_string(),
            kind: FunctionKind::Receive,
            selector: None,
        })
        .with_function(ContractFunction {
            name: "fallback".to_string(),
            kind: FunctionKind::Fallback,
            selector: None,
        });

    for calldata in [Bytes::new(), Bytes::from_static(&[9, 9, 9, 9])] {
        let trace =
            MessageTrace::Call(CallMessageTrace { contract: Some(contract.clone()), calldata });
        reporter.log_contract_and_function_name(Some(&trace), &[0x60], false);
    }

    assert_eq!(
        reporter.get_logs(),
        ["Contract call: Vault#<receive>", "Contract call: Vault#<fallback>"]
    );
}

#[test]
fn test_call_to_non_contract_warns_only_when_asked() {
    let mut reporter = reporter();
    let trace = call_to_foo_bar();

    reporter.log_contract_and_function_name(Some(&trace), &[], false);
    assert!(!reporter.has_logs());

    reporter.log_contract_and_function_name(Some(&trace), &[], true);
    assert_eq!(reporter.get_logs(), ["WARNING: Calling an account which is not a contract"]);
}

#[test]
fn test_deployment_shows_address_unless_failed() {
    let mut reporter = reporter();
    let deployed = Address::repeat_byte(0x42);
    let create = |failed| {
        MessageTrace::Create(CreateMessageTrace {
            contract: None,
            deployed_contract: Some(deployed),
            failed,
        })
    };

    reporter.log_contract_and_function_name(Some(&create(false)), &[], false);
    assert_eq!(
        reporter.get_logs(),
        [
            "Contract deployment: <UnrecognizedContract>".to_string(),
            format!("Contract address:    {deployed:#x}"),
        ]
    );

    reporter.clear_logs();
    reporter.log_contract_and_function_name(Some(&create(true)), &[], false);
    assert_eq!(reporter.get_logs().len(), 1);
}

#[test]
fn test_blank_line_between_transactions() {
    let mut reporter = reporter();
    reporter.log_mined_block(&mined(1, vec![tx(1), tx(2)]), &codes(2)).unwrap();
    let blank = reporter.get_logs().iter().filter(|line| line.is_empty()).count();
    assert_eq!(blank, 1);

    reporter.clear_logs();
    reporter.log_mined_block(&mined(2, vec![tx(3)]), &codes(1)).unwrap();
    assert!(reporter.get_logs().iter().all(|line| !line.is_empty()));
}

#[test]
fn test_mined_block_layout() {
    let mut reporter = reporter();
    reporter.log_mined_block(&mined(3, vec![tx(1)]), &codes(1)).unwrap();

    let hash = format!("{:#x}", B256::repeat_byte(0xcc));
    let from = format!("{:#x}", Address::repeat_byte(0xaa));
    let title = |t: &str| format!("{t:<22}");
    assert_eq!(
        reporter.get_logs(),
        [
            "  Mined block #3".to_string(),
            format!("    Block: {hash}"),
            format!("{} {:#x}", title("      Transaction:"), B256::repeat_byte(1)),
            format!("{} Foo#bar", title("        Contract call:")),
            format!("{} {from}", title("        From:")),
            format!("{} {:#x}", title("        To:"), Address::repeat_byte(0xbb)),
            format!("{} 0 ETH", title("        Value:")),
            format!("{} 21000 of 30000", title("        Gas used:")),
        ]
    );
    assert_eq!(reporter.state().current_indent(), 0);
}

#[test]
fn test_empty_mined_block() {
    let mut reporter = reporter();
    reporter.log_mined_block(&mined(9, vec![]), &[]).unwrap();
    assert_eq!(reporter.get_logs(), ["  Mined empty block #9"]);
}

#[test]
fn test_single_transaction_layout() {
    let mut reporter = reporter();
    let result = mined(4, vec![tx(7)]);
    let trace = &result.traces[0];
    reporter
        .log_single_transaction(&result.block.transactions[0], &result.block, 21_000, trace, &[0x60])
        .unwrap();

    let logs = reporter.get_logs();
    assert_eq!(logs[0], "  Contract call: Foo#bar");
    assert!(logs[1].starts_with("  Transaction:   0x0707"));
    assert_eq!(
        logs.last().map(String::as_str),
        Some(format!("  Block #4:      {:#x}", B256::repeat_byte(0xcc)).as_str())
    );
}

#[test]
#[should_panic(expected = "The array of codes should have the same length as the array of results")]
fn test_codes_must_match_results() {
    let mut reporter = reporter();
    let _ = reporter.log_block(&mined(1, vec![tx(1), tx(2)]), &codes(1), BlockLogOptions::default());
}

#[test]
#[should_panic(expected = "The array of traces should have the same length as the block transactions")]
fn test_traces_must_match_transactions() {
    let mut reporter = reporter();
    let mut result = mined(1, vec![tx(1), tx(2)]);
    result.traces.pop();
    let _ = reporter.log_interval_mined_block(&result, &codes(2));
}

#[test]
#[should_panic(expected = "The array of results should have the same length as the block transactions")]
fn test_results_must_match_transactions() {
    let mut reporter = reporter();
    let mut result = mined(1, vec![tx(1), tx(2)]);
    result.results.pop();
    let _ = reporter.log_mined_block(&result, &codes(1));
}

#[test]
fn test_console_logs_buffered() {
    let mut reporter = reporter();
    reporter.log_console_log_messages(&["a".to_string(), "b".to_string()]).unwrap();
    assert_eq!(reporter.get_logs(), ["", "console.log:", "  a", "  b"]);
    assert!(reporter.sink().calls().is_empty());

    reporter.clear_logs();
    reporter.log_console_log_messages(&[]).unwrap();
    assert!(!reporter.has_logs());
}

#[test]
fn test_console_logs_bypass_disabled_buffer() {
    let mut reporter = reporter();
    reporter.set_enabled(false);
    reporter
        .with_indent(|r| r.log_console_log_messages(&["a".to_string(), "b".to_string()]))
        .unwrap();

    assert!(!reporter.has_logs());
    assert_eq!(reporter.sink().screen(), ["a", "b"]);
}

#[test]
fn test_console_log_ends_empty_block_run() {
    let mut reporter = reporter();
    reporter.set_enabled(false);
    reporter.print_mined_block_number(5, true).unwrap();
    reporter.log_console_log_messages(&["hello from tx".to_string()]).unwrap();
    reporter.print_mined_block_number(6, true).unwrap();

    assert_eq!(
        reporter.sink().screen(),
        ["Mined empty block #5", "hello from tx", "Mined empty block #6"]
    );
    assert_eq!(reporter.state().empty_block_range_start(), Some(6));
}

#[test]
fn test_console_log_ends_method_run() {
    let mut reporter = reporter();
    reporter.set_enabled(false);
    reporter.print_method("eth_call").unwrap();
    reporter.log_console_log_messages(&["hello from tx".to_string()]).unwrap();
    reporter.print_method("eth_call").unwrap();

    assert_eq!(reporter.sink().screen(), ["eth_call", "hello from tx", "eth_call"]);
    assert_eq!(reporter.sink().replacements(), 0);
}

#[test]
fn test_call_trace_omits_zero_value() {
    let mut reporter = reporter();
    let params = CallParams {
        from: Address::repeat_byte(1),
        to: Some(Address::repeat_byte(2)),
        value: U256::ZERO,
        gas_limit: None,
    };
    reporter.log_call_trace(&params, &[], Some(&call_to_foo_bar()), &[], None).unwrap();

    let logs = reporter.get_logs();
    assert_eq!(logs[0], "  WARNING: Calling an account which is not a contract");
    assert!(logs.iter().all(|line| !line.contains("Value")));

    reporter.clear_logs();
    let params = CallParams { value: U256::from(1_000_000_000_000_000_000u128), ..params };
    reporter.log_call_trace(&params, &[0x60], Some(&call_to_foo_bar()), &[], None).unwrap();
    assert!(reporter.get_logs().iter().any(|line| line.ends_with(" 1 ETH")));
}

#[test]
fn test_estimate_gas_failure_logs_solidity_error() {
    let mut reporter = reporter();
    let params = CallParams {
        from: Address::repeat_byte(1),
        to: Some(Address::repeat_byte(2)),
        value: U256::ZERO,
        gas_limit: None,
    };
    let error = ExecutionError::Solidity(SolidityError::new("reverted").with_frame(StackTraceEntry {
        contract: Some("Foo".to_string()),
        function: Some("bar".to_string()),
        location: Some(SourceLocation { file: "contracts/Foo.sol".to_string(), line: 3 }),
    }));
    reporter
        .log_estimate_gas_trace(&params, &[0x60], Some(&call_to_foo_bar()), &[], &error)
        .unwrap();

    let logs = reporter.get_logs();
    assert_eq!(
        logs[logs.len() - 2..],
        ["".to_string(), "  Error: reverted\n      at Foo.bar (contracts/Foo.sol:3)".to_string()]
    );
}

#[test]
fn test_sent_transaction_with_other_pending_transactions() {
    info!("Replaying a block with two transactions");
    let mut reporter = reporter();
    let result = mined(10, vec![tx(1), tx(2)]);
    reporter
        .handle_event(&ReporterEvent::SendTransaction {
            hash: B256::repeat_byte(2),
            results: vec![result],
            codes: vec![codes(2)],
        })
        .unwrap();

    let logs = reporter.get_logs();
    assert_eq!(logs[0], "  There were other pending transactions mined in the same block:");
    assert_eq!(logs[1], "");
    assert!(logs[2].starts_with("  Block #10: 0x"));
    assert!(logs.iter().any(|line| line == "  Currently sent transaction:"));
    assert_eq!(reporter.state().current_indent(), 0);
}

#[test]
fn test_single_sent_transaction_is_flushed_by_method() {
    let mut reporter = reporter();
    let events = [
        ReporterEvent::SendTransaction {
            hash: B256::repeat_byte(1),
            results: vec![mined(1, vec![tx(1)])],
            codes: vec![codes(1)],
        },
        ReporterEvent::Method { method: "eth_sendTransaction".into() },
    ];
    reporter.replay(&events).unwrap();

    let screen = reporter.sink().screen();
    assert_eq!(screen[0], "eth_sendTransaction");
    assert_eq!(screen[1], "  Contract call: Foo#bar");
    assert_eq!(screen.last().map(String::as_str), Some(""));
    assert!(!reporter.has_logs());
}

#[test]
fn test_interval_mining_session() {
    let mut reporter = reporter();
    let events = [
        ReporterEvent::IntervalMinedBlock { result: mined(5, vec![]), codes: vec![] },
        ReporterEvent::IntervalMinedBlock { result: mined(6, vec![]), codes: vec![] },
        ReporterEvent::Method { method: "eth_blockNumber".into() },
        ReporterEvent::IntervalMinedBlock { result: mined(7, vec![tx(1)]), codes: codes(1) },
    ];
    reporter.replay(&events).unwrap();

    let screen = reporter.sink().screen();
    assert_eq!(screen[0], "Mined empty block range #5 to #6");
    assert_eq!(screen[1], "eth_blockNumber");
    assert_eq!(screen[2], "Mined block #7");
    assert!(screen[3].starts_with("  Block: 0x"));
    assert_eq!(screen.last().map(String::as_str), Some(""));
}

#[test]
fn test_disabled_reporter_still_prints_console_logs() {
    let mut reporter = reporter();
    let mut result = mined(1, vec![tx(1)]);
    result.traces[0].console_log_messages = vec!["hello from Foo".to_string()];

    let events = [
        ReporterEvent::SetEnabled { enabled: false },
        ReporterEvent::MinedBlock { result, codes: codes(1) },
        ReporterEvent::Method { method: "evm_mine".into() },
    ];
    reporter.replay(&events).unwrap();

    assert_eq!(reporter.sink().screen(), ["hello from Foo"]);
}
