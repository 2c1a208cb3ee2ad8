use ledger_forecast::error::ForecastError;
use ledger_forecast::{DataLoader, Period};
use ledger_math::MathError;
use std::io;

#[test]
fn test_io_and_parse_errors_convert() {
    let missing = io::Error::new(io::ErrorKind::NotFound, "ledger.csv");
    assert!(matches!(ForecastError::from(missing), ForecastError::IoError(_)));

    let bad_year = "20x4".parse::<i32>().unwrap_err();
    assert!(matches!(ForecastError::from(bad_year), ForecastError::ParseError(_)));

    let loaded = DataLoader::from_csv("/nonexistent/ledger.csv");
    assert!(matches!(loaded, Err(ForecastError::IoError(_))));
}

#[test]
fn test_math_error_keeps_its_cause() {
    let cause = MathError::InsufficientData("a line needs two points".to_string());

    match ForecastError::from(cause.clone()) {
        ForecastError::MathError(inner) => assert_eq!(inner, cause),
        other => panic!("unexpected variant: {:?}", other),
    }
}

#[test]
fn test_messages_name_the_failure() {
    let period = "2024-13".parse::<Period>().unwrap_err().to_string();
    assert!(period.contains("13"), "message was {period}");

    let denied = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let message = ForecastError::from(denied).to_string();
    assert!(message.starts_with("IO error"));
    assert!(message.contains("permission denied"));

    let truncated = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(ForecastError::from(truncated).to_string().starts_with("JSON error"));
}
