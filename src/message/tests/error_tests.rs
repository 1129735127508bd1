//! Unit tests for `DecodeError` classification and conversions.

use crate::message::error::{DecodeError, DecodeErrorKind, RegistryError, ValidationError};
use rstest::rstest;

#[test]
fn serde_errors_become_parse_errors() {
    let serde_err =
        serde_json::from_str::<serde_json::Value>("{not json").expect_err("malformed JSON");
    let err = DecodeError::from(serde_err);

    assert_eq!(err.kind(), DecodeErrorKind::Parse);
    assert!(err.to_string().starts_with("malformed JSON"));
}

#[test]
fn validation_errors_are_transparent() {
    let err = DecodeError::from(ValidationError::InvalidRole("admin".to_owned()));
    assert_eq!(err.kind(), DecodeErrorKind::Validation);
    assert_eq!(err.to_string(), "invalid role 'admin'");
}

#[rstest]
#[case(DecodeError::missing("content"), DecodeErrorKind::Schema)]
#[case(
    DecodeError::UnknownType { content_type: "NOPE".to_owned(), registered: Vec::new() },
    DecodeErrorKind::UnknownType
)]
#[case(
    DecodeError::DocumentTooLarge { actual_bytes: 10, limit_bytes: 5 },
    DecodeErrorKind::Limit
)]
#[case(
    DecodeError::from(RegistryError::LockPoisoned("boom".to_owned())),
    DecodeErrorKind::Registry
)]
fn decode_errors_report_their_kind(#[case] err: DecodeError, #[case] expected: DecodeErrorKind) {
    assert_eq!(err.kind(), expected);
}

#[test]
fn schema_error_names_missing_key() {
    assert_eq!(DecodeError::missing("content").to_string(), "missing content");
}

#[test]
fn limit_error_reports_sizes() {
    let err = DecodeError::DocumentTooLarge {
        actual_bytes: 2048,
        limit_bytes: 1024,
    };
    assert_eq!(
        err.to_string(),
        "document size 2048 exceeds limit of 1024 bytes"
    );
}
