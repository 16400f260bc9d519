// tests/execution_result.rs
mod common;
use crate::common::builders::{millis, TriggerRequestBuilder};

use std::error::Error;

use jobexec::types::{ExecutionResult, ProcessReport, UNSET_EXIT_CODE};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn exit_code_mapping() {
    assert_eq!(ExecutionResult::from_exit_code(0), ExecutionResult::Success);

    for code in [1, 3, 137, 255, UNSET_EXIT_CODE] {
        let result = ExecutionResult::from_exit_code(code);
        assert!(!result.is_success());
        assert_eq!(result.exit_code(), code);
        let message = result.message().unwrap_or_default();
        assert!(message.contains(&format!("({code})")), "{message}");
    }
}

#[test]
fn results_serialize_for_the_cli() -> TestResult {
    assert_eq!(
        serde_json::to_string(&ExecutionResult::Success)?,
        r#"{"status":"success"}"#
    );
    assert_eq!(
        serde_json::to_string(&ExecutionResult::from_exit_code(2))?,
        r#"{"status":"failed","exit_code":2,"message":"command exit value(2) is failed"}"#
    );
    assert_eq!(
        ExecutionResult::from_exit_code(2).to_string(),
        "failed: command exit value(2) is failed"
    );
    Ok(())
}

#[test]
fn process_report_uses_scheduler_field_names() -> TestResult {
    let request = TriggerRequestBuilder::new("{}").log_id(12).build();
    let report = ProcessReport::new(&request, 4321);

    assert_eq!(report.log_date_time, millis(1_700_000_000_000));
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["logId"], 12);
    assert_eq!(json["logDateTime"], 1_700_000_000_000i64);
    assert_eq!(json["processId"], "4321");
    Ok(())
}
