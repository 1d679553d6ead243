//! Decoding pipeline: base64, three keyed layers, length prefix

use crate::cipher::key::{derive_master_key, MasterKey};
use crate::cipher::{shift, substitution, transposition};
use crate::error::VsrcError;
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

/// Number of layers, applied with iterations descending from this value to 1
pub const LAYER_COUNT: u8 = 3;

const LENGTH_PREFIX_LEN: usize = 4;
const MAX_PAYLOAD_LEN: usize = 9999;

/// Decode a ciphertext with the page's client key and the server key
pub fn decode(ciphertext: &str, client_key: &str, server_key: &str) -> Result<String> {
    if client_key.is_empty() {
        return Err(VsrcError::EmptyInput("client key".to_string()));
    }
    if server_key.is_empty() {
        return Err(VsrcError::EmptyInput("server key".to_string()));
    }
    decode_with_master_key(ciphertext, &derive_master_key(client_key, server_key))
}

/// Decode a ciphertext with a master key derived earlier
pub fn decode_with_master_key(ciphertext: &str, master_key: &MasterKey) -> Result<String> {
    let ciphertext = ciphertext.trim();
    if ciphertext.is_empty() {
        return Err(VsrcError::EmptyInput("ciphertext".to_string()));
    }

    let mut text = STANDARD.decode(ciphertext)?;
    debug!("Decoding {} byte payload with {} layers", text.len(), LAYER_COUNT);

    for iteration in (1..=LAYER_COUNT).rev() {
        let layer_key = master_key.layer_key(iteration);
        text = shift::decode(&text, &layer_key);
        text = transposition::decode(&text, &layer_key);
        text = substitution::decode(&text, &layer_key);
    }

    let payload = strip_length_prefix(&text)?;
    // Bytes map one-to-one onto the first 256 code points
    Ok(payload.iter().map(|&byte| char::from(byte)).collect())
}

fn strip_length_prefix(text: &[u8]) -> Result<&[u8]> {
    let prefix = text.get(..LENGTH_PREFIX_LEN).ok_or_else(|| {
        VsrcError::MalformedPayload(format!("{} bytes is too short for a length prefix", text.len()))
    })?;
    if !prefix.iter().all(u8::is_ascii_digit) {
        return Err(VsrcError::MalformedPayload(
            "length prefix is not a decimal number".to_string(),
        ));
    }
    let len = prefix
        .iter()
        .fold(0usize, |len, digit| len * 10 + usize::from(digit - b'0'));

    text.get(LENGTH_PREFIX_LEN..LENGTH_PREFIX_LEN + len)
        .ok_or_else(|| {
            VsrcError::MalformedPayload(format!(
                "declared length {} exceeds the {} decoded bytes",
                len,
                text.len() - LENGTH_PREFIX_LEN
            ))
        })
}

/// Companion encoder: the exact inverse of [`decode_with_master_key`].
///
/// Only payloads whose characters fit in one byte and whose length fits the
/// four-digit prefix can be encoded.
pub fn encode(payload: &str, master_key: &MasterKey) -> Result<String> {
    let bytes = payload
        .chars()
        .map(|c| u8::try_from(c).map_err(|_| {
            VsrcError::MalformedPayload(format!("character {:?} cannot be encoded", c))
        }))
        .collect::<Result<Vec<u8>>>()?;
    if bytes.len() > MAX_PAYLOAD_LEN {
        return Err(VsrcError::MalformedPayload(format!(
            "payload of {} bytes does not fit the length prefix",
            bytes.len()
        )));
    }

    let mut text = format!("{:04}", bytes.len()).into_bytes();
    text.extend_from_slice(&bytes);
    Ok(STANDARD.encode(seal(text, master_key)))
}

fn seal(mut text: Vec<u8>, master_key: &MasterKey) -> Vec<u8> {
    for iteration in 1..=LAYER_COUNT {
        let layer_key = master_key.layer_key(iteration);
        text = substitution::encode(&text, &layer_key);
        text = transposition::encode(&text, &layer_key);
        text = shift::encode(&text, &layer_key);
    }
    text
}
