//! Behavioural integration tests for envelope serialisation and decoding.
//!
//! These tests exercise the complete flow from building an envelope through
//! its canonical JSON text and back through the process-wide registry.

use insightful_messages::message::{
    codec::{ContentTypeRegistry, deserialize_envelope},
    domain::{
        ConnectionParameters, DicomOperation, DicomOperationKind, Endpoint, Envelope,
        FileOrDirectory, GenericPayload, Payload, Role, StringPayload, Timestamp,
    },
    error::DecodeErrorKind,
    ports::decoder::DecoderConfig,
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

fn c_store_envelope() -> Envelope {
    let operation = DicomOperation::new(
        DicomOperationKind::CStore,
        Endpoint::new("SCU", "localhost", Some(0)),
        Endpoint::new("SCP", "localhost", Some(4242)),
    )
    .with_op_parameters(FileOrDirectory::from_file("/path/to/filename.dcm"))
    .expect("C-STORE accepts file parameters");
    Envelope::new(Role::User, operation)
}

// ============================================================================
// Scenario: A C-STORE request survives transport unchanged
// ============================================================================

/// When an agent serialises a C-STORE request and a peer decodes it,
/// the peer sees the same request and re-serialises it byte for byte.
#[test]
fn c_store_request_survives_transport() {
    // Arrange
    let envelope = c_store_envelope();

    // Act
    let text = envelope.to_string();
    let decoded = deserialize_envelope(&text).expect("canonical documents decode");

    // Assert
    assert_eq!(decoded, envelope);
    assert_eq!(decoded.to_string(), text);
}

/// The sender leaves its port to the transport; the absent port survives
/// the round trip and is written back as `null`.
#[test]
fn c_store_request_with_unset_sender_port_survives_transport() {
    // Arrange
    let operation = DicomOperation::new(
        DicomOperationKind::CStore,
        Endpoint::new("SCU", "localhost", None),
        Endpoint::new("SCP", "localhost", Some(4242)),
    )
    .with_connection(ConnectionParameters::new())
    .with_op_parameters(FileOrDirectory::from_file("/path/to/filename.dcm"))
    .expect("C-STORE accepts file parameters");
    let envelope = Envelope::new(Role::User, operation);

    // Act
    let text = envelope.to_json_string();
    let decoded = deserialize_envelope(&text).expect("canonical documents decode");

    // Assert
    assert_eq!(decoded, envelope);
    assert_eq!(decoded.to_json_string(), text);
    let document: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(document["content"]["sender"]["port"], serde_json::Value::Null);
    assert_eq!(document["content"]["receiver"]["port"], json!(4242));
}

// ============================================================================
// Scenario: Every built-in variant round-trips
// ============================================================================

#[rstest]
#[case(Role::User, Payload::from(StringPayload::new("hello")))]
#[case(Role::System, Payload::from(GenericPayload::new(json!({"progress": [1, 2, 3]}))))]
#[case(Role::User, Payload::from(FileOrDirectory::from_directory_list(["/s1", "/s2"])))]
#[case(Role::User, Payload::from(FileOrDirectory::empty()))]
#[case(Role::System, Payload::from(StringPayload::new("").with_timestamp("2024-05-01T12:00:00Z")))]
fn built_in_variants_round_trip(#[case] role: Role, #[case] payload: Payload) {
    let envelope = Envelope::new(role, payload);
    let decoded = deserialize_envelope(&envelope.to_json_string()).expect("variant decodes");
    assert_eq!(decoded, envelope);
}

#[test]
fn stamped_payload_round_trips_with_its_timestamp() {
    let payload = Payload::from(StringPayload::new("stamped")).stamped(&DefaultClock);
    let stamp = payload.timestamp().cloned();
    let envelope = Envelope::new(Role::User, payload);

    let decoded = deserialize_envelope(&envelope.to_json_string()).expect("stamped decodes");
    assert_eq!(decoded.content().timestamp().cloned(), stamp);
    assert!(stamp.as_ref().and_then(Timestamp::as_str).is_some());
}

// ============================================================================
// Scenario: Legacy documents are accepted
// ============================================================================

/// Upstream producers still write `"None"` for unset values and send ports
/// as strings; such documents decode to the canonical form.
#[test]
fn legacy_document_decodes_to_canonical_form() {
    // Arrange
    let legacy = json!({
        "role": "user",
        "content": {
            "content_type": "DCM",
            "operation": "C-STORE",
            "sender": {"ae_title": "SCU", "addr": "localhost", "port": "0"},
            "receiver": {"ae_title": "SCP", "addr": "localhost", "port": "4242"},
            "connection": {"dimse_timeout": "None", "socket_timeout": "None", "acse_timeout": "None"},
            "op_parameters": {"content_type": "FILEDIR", "file": "/path/to/filename.dcm"},
        },
    });

    // Act
    let decoded = deserialize_envelope(&legacy).expect("legacy document decodes");

    // Assert
    assert_eq!(decoded, c_store_envelope());
    let Payload::DicomOperation(operation) = decoded.content() else {
        panic!("expected a DICOM operation");
    };
    assert_eq!(operation.connection(), &ConnectionParameters::default());
}

#[test]
fn strict_registry_rejects_legacy_markers() {
    let registry = ContentTypeRegistry::with_config(DecoderConfig::strict());
    let legacy = json!({
        "role": "user",
        "content": {
            "content_type": "DCM",
            "operation": "C-STORE",
            "sender": {"ae_title": "SCU", "addr": "localhost", "port": 0},
            "receiver": {"ae_title": "SCP", "addr": "localhost", "port": 4242},
            "connection": {"dimse_timeout": "None"},
            "op_parameters": null,
        },
    });

    let err = registry
        .decode_envelope(&legacy)
        .expect_err("strict mode rejects legacy markers");
    assert_eq!(err.kind(), DecodeErrorKind::Validation);
}

// ============================================================================
// Scenario: Failures are reported, not thrown
// ============================================================================

/// A stream of documents with a bad entry still yields every good entry.
#[test]
fn mixed_stream_yields_every_valid_envelope() {
    let valid = c_store_envelope().to_json_string();
    let documents = [
        valid.as_str(),
        r#"{"role":"user","content":{"content_type":"NOPE"}}"#,
        r#"{"role":"admin","content":{"content_type":"STRING","value":"x"}}"#,
        valid.as_str(),
    ];

    let registry = ContentTypeRegistry::new();
    let results = registry.decode_batch(documents);
    let kinds: Vec<Option<DecodeErrorKind>> = results
        .iter()
        .map(|result| result.as_ref().err().map(|err| err.kind()))
        .collect();

    assert_eq!(
        kinds,
        [
            None,
            Some(DecodeErrorKind::UnknownType),
            Some(DecodeErrorKind::Validation),
            None,
        ]
    );
}
