//! Unit tests for endpoints and connection parameters.

use crate::message::{
    domain::{ConnectionParameters, Endpoint},
    error::{DecodeError, ValidationError},
    ports::decoder::DecoderConfig,
};
use rstest::rstest;
use serde_json::{Value, json};

// ============================================================================
// Endpoint tests
// ============================================================================

#[test]
fn endpoint_renders_all_fields() {
    let endpoint = Endpoint::new("SCP", "localhost", Some(4242));
    assert_eq!(
        endpoint.to_json(),
        json!({"ae_title": "SCP", "addr": "localhost", "port": 4242})
    );
}

#[test]
fn endpoint_without_port_renders_null() {
    let endpoint = Endpoint::new("SCU", "10.0.0.5", None);
    assert_eq!(endpoint.to_json()["port"], Value::Null);
}

#[rstest]
#[case(json!(4242), Some(4242))]
#[case(json!("4242"), Some(4242))]
#[case(json!(null), None)]
#[case(json!("None"), None)]
fn endpoint_from_json_coerces_port(#[case] port: Value, #[case] expected: Option<u16>) {
    let document = json!({"ae_title": "SCP", "addr": "localhost", "port": port});
    let endpoint =
        Endpoint::from_json(&document, &DecoderConfig::default()).expect("endpoint decodes");
    assert_eq!(endpoint.port(), expected);
}

#[test]
fn endpoint_from_json_accepts_missing_port() {
    let document = json!({"ae_title": "SCP", "addr": "localhost"});
    let endpoint =
        Endpoint::from_json(&document, &DecoderConfig::default()).expect("endpoint decodes");
    assert_eq!(endpoint.port(), None);
}

#[rstest]
#[case(json!(-1))]
#[case(json!("-104"))]
fn endpoint_from_json_rejects_negative_port(#[case] port: Value) {
    let document = json!({"ae_title": "SCP", "addr": "localhost", "port": port});
    let err = Endpoint::from_json(&document, &DecoderConfig::default())
        .expect_err("negative ports are rejected");
    assert!(matches!(
        err,
        DecodeError::Validation(ValidationError::NegativeValue { ref field, .. }) if field == "port"
    ));
}

#[test]
fn endpoint_from_json_rejects_port_above_u16() {
    let document = json!({"ae_title": "SCP", "addr": "localhost", "port": 70_000});
    let err = Endpoint::from_json(&document, &DecoderConfig::default())
        .expect_err("ports above 65535 are rejected");
    assert!(matches!(
        err,
        DecodeError::Validation(ValidationError::OutOfRange { value: 70_000, .. })
    ));
}

#[rstest]
#[case(json!({"addr": "localhost"}), "ae_title")]
#[case(json!({"ae_title": "SCP"}), "addr")]
fn endpoint_from_json_requires_identity(#[case] document: Value, #[case] field: &str) {
    let err = Endpoint::from_json(&document, &DecoderConfig::default())
        .expect_err("identity fields are required");
    assert_eq!(err, DecodeError::missing(field));
}

#[test]
fn strict_config_rejects_numeric_string_port() {
    let document = json!({"ae_title": "SCP", "addr": "localhost", "port": "4242"});
    let err = Endpoint::from_json(&document, &DecoderConfig::strict())
        .expect_err("strict mode wants integers");
    assert!(matches!(
        err,
        DecodeError::Validation(ValidationError::InvalidInteger { .. })
    ));
}

// ============================================================================
// ConnectionParameters tests
// ============================================================================

#[test]
fn connection_defaults_render_as_nulls() {
    assert_eq!(
        ConnectionParameters::default().to_json(),
        json!({"dimse_timeout": null, "socket_timeout": null, "acse_timeout": null})
    );
}

#[test]
fn connection_from_json_accepts_legacy_and_canonical_markers() {
    let document = json!({"dimse_timeout": "None", "socket_timeout": null, "acse_timeout": "30"});
    let connection = ConnectionParameters::from_json(&document, &DecoderConfig::default())
        .expect("legacy markers decode");

    assert_eq!(connection.dimse_timeout(), None);
    assert_eq!(connection.socket_timeout(), None);
    assert_eq!(connection.acse_timeout(), Some(30));
}

#[test]
fn connection_from_json_rejects_legacy_marker_in_strict_mode() {
    let document = json!({"dimse_timeout": "None"});
    assert!(ConnectionParameters::from_json(&document, &DecoderConfig::strict()).is_err());
}

#[rstest]
#[case(json!({"dimse_timeout": -5}), "dimse_timeout")]
#[case(json!({"socket_timeout": "-1"}), "socket_timeout")]
fn connection_from_json_rejects_negative_timeouts(#[case] document: Value, #[case] field: &str) {
    let err = ConnectionParameters::from_json(&document, &DecoderConfig::default())
        .expect_err("negative timeouts are rejected");
    assert!(matches!(
        err,
        DecodeError::Validation(ValidationError::NegativeValue { field: ref f, .. }) if f == field
    ));
}

#[test]
fn connection_setters_validate_non_negativity() {
    let mut connection = ConnectionParameters::new().with_socket_timeout(5);

    let err = connection
        .set_socket_timeout(Some(-1))
        .expect_err("negative timeouts are rejected");
    assert_eq!(
        err,
        ValidationError::NegativeValue {
            field: "socket_timeout".to_owned(),
            value: -1,
        }
    );
    assert_eq!(connection.socket_timeout(), Some(5));

    connection.set_socket_timeout(None).expect("clearing is allowed");
    assert_eq!(connection.socket_timeout(), None);
}
