//! Decoders for the built-in payload variants.

use std::sync::Arc;

use serde_json::Value;

use crate::message::{
    codec::ContentTypeRegistry,
    domain::{
        ConnectionParameters, DicomOperation, DicomOperationKind, Endpoint, FileOrDirectory,
        GenericPayload, Payload, StringPayload, Timestamp, check_content_type, content_type,
        fields,
    },
    ports::decoder::{ContentDecoder, DecodeResult},
};

/// Returns the decoders every registry starts with, keyed by discriminator.
pub(super) fn decoders() -> Vec<(&'static str, Arc<dyn ContentDecoder>)> {
    vec![
        entry(content_type::STRING, decode_string),
        entry(content_type::FILEDIR, decode_file_dir),
        entry(content_type::GENERIC, decode_generic),
        entry(content_type::DCM, decode_dicom),
    ]
}

fn entry<D>(content_type: &'static str, decoder: D) -> (&'static str, Arc<dyn ContentDecoder>)
where
    D: ContentDecoder + 'static,
{
    let decoder: Arc<dyn ContentDecoder> = Arc::new(decoder);
    (content_type, decoder)
}

fn decode_string(content: &Value, _registry: &ContentTypeRegistry) -> DecodeResult<Payload> {
    StringPayload::from_json(content).map(Payload::String)
}

fn decode_generic(content: &Value, _registry: &ContentTypeRegistry) -> DecodeResult<Payload> {
    GenericPayload::from_json(content).map(Payload::Generic)
}

fn decode_file_dir(content: &Value, _registry: &ContentTypeRegistry) -> DecodeResult<Payload> {
    FileOrDirectory::from_json(content).map(Payload::FileOrDirectory)
}

fn decode_dicom(content: &Value, registry: &ContentTypeRegistry) -> DecodeResult<Payload> {
    let object = fields::object(content, "content")?;
    check_content_type(object, content_type::DCM)?;
    let config = registry.config();

    let operation_name = fields::require_str(object, "operation")?;
    let operation = DicomOperationKind::try_from(operation_name.as_str())?;
    let sender = Endpoint::from_json(fields::require(object, "sender")?, config)?;
    let receiver = Endpoint::from_json(fields::require(object, "receiver")?, config)?;
    let connection = match object.get("connection") {
        None | Some(Value::Null) => ConnectionParameters::default(),
        Some(value) => ConnectionParameters::from_json(value, config)?,
    };
    let op_parameters = decode_op_parameters(operation, object.get("op_parameters"), registry)?;

    let mut dicom = DicomOperation::new(operation, sender, receiver).with_connection(connection);
    dicom.set_op_parameters(op_parameters)?;
    dicom.set_timestamp(Timestamp::read(object));
    Ok(Payload::DicomOperation(dicom))
}

/// Resolves nested operation parameters through the registry.
///
/// Operations with a fixed parameter type are decoded with that type's
/// decoder. Open parameters are decoded by their own discriminator when it
/// is registered and kept as a generic value otherwise.
fn decode_op_parameters(
    operation: DicomOperationKind,
    value: Option<&Value>,
    registry: &ContentTypeRegistry,
) -> DecodeResult<Option<Payload>> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    if registry.config().accept_legacy_none_marker && value.as_str() == Some(fields::LEGACY_NONE) {
        return Ok(None);
    }

    match operation.parameter_content_type() {
        Some(expected) => {
            let object = fields::object(value, "op_parameters")?;
            check_content_type(object, expected)?;
            registry.decode_as(expected, value).map(Some)
        }
        None => {
            let registered = value
                .get("content_type")
                .and_then(Value::as_str)
                .map(|ct| registry.lookup(ct))
                .transpose()?
                .flatten()
                .is_some();
            if registered {
                registry.decode_payload(value).map(Some)
            } else {
                Ok(Some(Payload::Generic(GenericPayload::new(value.clone()))))
            }
        }
    }
}
