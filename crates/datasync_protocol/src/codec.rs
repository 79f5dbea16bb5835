//! CBOR encoding of operation and response batches.
//!
//! A batch is a map of the protocol version and the items in order. Decoding
//! refuses batches written by another protocol version.
//!
//! ```rust,ignore
//! let bytes = codec::encode_operations(&operations)?;
//! let decoded: Vec<SyncOperation<Note>> = codec::decode_operations(&bytes)?;
//! ```

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::SyncOperation;
use crate::response::SyncResponse;
use datasync_core::Identifiable;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Version written into every encoded batch.
pub const PROTOCOL_VERSION: u16 = 1;

#[derive(Serialize)]
struct BatchRef<'a, T> {
    version: u16,
    items: &'a [T],
}

#[derive(Deserialize)]
struct Batch<T> {
    version: u16,
    items: Vec<T>,
}

fn encode_batch<T: Serialize>(items: &[T]) -> ProtocolResult<Vec<u8>> {
    let batch = BatchRef {
        version: PROTOCOL_VERSION,
        items,
    };
    let mut buf = Vec::new();
    ciborium::into_writer(&batch, &mut buf).map_err(|e| ProtocolError::codec(e.to_string()))?;
    Ok(buf)
}

fn decode_batch<T: DeserializeOwned>(bytes: &[u8]) -> ProtocolResult<Vec<T>> {
    // Items stay undecoded until the version is known to be ours.
    let batch: Batch<ciborium::Value> =
        ciborium::from_reader(bytes).map_err(|e| ProtocolError::codec(e.to_string()))?;
    if batch.version != PROTOCOL_VERSION {
        return Err(ProtocolError::VersionMismatch {
            local: PROTOCOL_VERSION,
            remote: batch.version,
        });
    }
    batch
        .items
        .iter()
        .map(|item| {
            item.deserialized()
                .map_err(|e| ProtocolError::codec(e.to_string()))
        })
        .collect()
}

/// Encodes a request batch.
pub fn encode_operations<E: Serialize>(operations: &[SyncOperation<E>]) -> ProtocolResult<Vec<u8>> {
    encode_batch(operations)
}

/// Decodes a request batch.
pub fn decode_operations<E: DeserializeOwned>(bytes: &[u8]) -> ProtocolResult<Vec<SyncOperation<E>>> {
    decode_batch(bytes)
}

/// Encodes a response batch.
pub fn encode_responses<E>(responses: &[SyncResponse<E>]) -> ProtocolResult<Vec<u8>>
where
    E: Identifiable + Serialize,
    E::Id: Serialize,
{
    encode_batch(responses)
}

/// Decodes a response batch.
pub fn decode_responses<E>(bytes: &[u8]) -> ProtocolResult<Vec<SyncResponse<E>>>
where
    E: Identifiable + DeserializeOwned,
    E::Id: DeserializeOwned,
{
    decode_batch(bytes)
}
