//! Codec bridge between HTTP bodies and typed request shapes.
//!
//! Two strategies, chosen per route when the route table is built: plain
//! JSON for gateway-native shapes, and protobuf-JSON for shapes that are
//! the control plane's protobuf types (the federation batch endpoints).
//! Picking the strategy at registration time keeps a route from ever being
//! decoded with the wrong bridge.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    ProtoJson,
}

#[derive(Debug, Error)]
#[error("Error parsing data: {0}")]
pub struct DecodeError(String);

/// Decode a request body into `T`, returning the number of bytes consumed.
///
/// An empty body is not an error: it yields `T::default()` with a zero byte
/// count, so handlers can apply "list everything" semantics or insist on a
/// body where one is required.
pub fn decode<T>(codec: Codec, body: &[u8]) -> Result<(usize, T), DecodeError>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return Ok((0, T::default()));
    }

    let value = match codec {
        Codec::Json => serde_json::from_slice(body).map_err(|e| DecodeError(e.to_string()))?,
        Codec::ProtoJson => {
            let raw: Value =
                serde_json::from_slice(body).map_err(|e| DecodeError(e.to_string()))?;
            serde_json::from_value(normalize_proto_keys(raw))
                .map_err(|e| DecodeError(e.to_string()))?
        }
    };

    Ok((body.len(), value))
}

/// protobuf-JSON serializes fields in lowerCamelCase; our shapes are
/// snake_case. Rewrites object keys recursively so both spellings decode.
fn normalize_proto_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), normalize_proto_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_proto_keys).collect()),
        other => other,
    }
}

fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
