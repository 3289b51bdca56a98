//! Formatting of the test results for display.

use serde_json::Value;

use crate::{diff::Segment, test::TestResult};

pub const UNRECOGNIZED_OUTPUT: &str = "Did not recognize output type";

/// Objects and arrays are serialized to JSON, strings and numbers are displayed as is.
pub fn format_output(output: &Value) -> String {
    match output {
        Value::Object(_) | Value::Array(_) | Value::Null => output.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(_) => UNRECOGNIZED_OUTPUT.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    pub expected: String,
    pub actual: String,
    pub diff: Option<Vec<Segment>>,
}

/// The message recorded with a completed test run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunMessage {
    Failure(FailureReport),
    Error(String),
}

pub fn format_message(result: &TestResult) -> Option<RunMessage> {
    match result {
        TestResult::Success => None,
        TestResult::Failure {
            expected,
            actual,
            diff,
        } => Some(RunMessage::Failure(FailureReport {
            expected: format_output(expected),
            actual: format_output(actual),
            diff: diff.clone(),
        })),
        TestResult::Error(message) => Some(RunMessage::Error(message.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outputs() {
        assert_eq!(format_output(&json!("tpubABC")), "tpubABC");
        assert_eq!(format_output(&json!(3)), "3");
        assert_eq!(format_output(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(format_output(&json!([1, 2])), "[1,2]");
        assert_eq!(format_output(&json!(true)), UNRECOGNIZED_OUTPUT);
    }

    #[test]
    fn failure_message_has_both_values() {
        let result = TestResult::compare(json!("A"), json!("B"));
        match format_message(&result) {
            Some(RunMessage::Failure(report)) => {
                assert_eq!(report.expected, "A");
                assert_eq!(report.actual, "B");
                assert!(report.diff.is_some());
            }
            m => panic!("unexpected {:?}", m),
        }
    }

    #[test]
    fn error_and_success_messages() {
        assert_eq!(format_message(&TestResult::Success), None);
        assert_eq!(
            format_message(&TestResult::Error("device unplugged".into())),
            Some(RunMessage::Error("device unplugged".into()))
        );
    }
}
