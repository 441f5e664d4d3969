//! Identity-document image encoding
//!
//! The verification backend takes both images as raw base64 payloads in a
//! JSON body. Whatever the capture source produced (raw bytes or a
//! `data:image/...;base64,` URI), the payload sent over the wire carries no
//! scheme prefix. No content validation happens client-side; the backend is
//! the authority on what it accepts.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Transport-safe encoding of one captured image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Encode raw image bytes read fully into memory
    pub fn encode(bytes: &[u8]) -> Self {
        Self(BASE64.encode(bytes))
    }

    /// Accept an already-encoded payload, stripping any leading
    /// `data:<mime>;base64,` scheme prefix.
    pub fn from_data_uri(input: &str) -> Self {
        let raw = match input.split_once("base64,") {
            Some((head, rest)) if head.starts_with("data:") => rest,
            _ => input,
        };
        Self(raw.to_string())
    }

    /// Recover the original bytes
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Encode an optional capture; a missing image stays absent
pub fn encode_optional(bytes: Option<&[u8]>) -> Option<ImagePayload> {
    bytes.map(ImagePayload::encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let original = b"\x89PNG\r\n\x1a\n fake image bytes \x00\xff".to_vec();
        let payload = ImagePayload::encode(&original);

        assert_eq!(payload.decode().unwrap(), original);
    }

    #[test]
    fn test_round_trip_large_input() {
        // Size-independent: a few hundred KB behaves the same as a few bytes
        let original: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        let payload = ImagePayload::encode(&original);

        assert_eq!(payload.decode().unwrap(), original);
    }

    #[test]
    fn test_no_data_uri_prefix_in_output() {
        let payload = ImagePayload::encode(b"selfie");
        assert!(!payload.as_str().contains("data:"));

        let from_uri = ImagePayload::from_data_uri("data:image/png;base64,c2VsZmll");
        assert!(!from_uri.as_str().contains("data:"));
        assert_eq!(from_uri.decode().unwrap(), b"selfie");
    }

    #[test]
    fn test_from_data_uri_passes_plain_payload_through() {
        let plain = ImagePayload::from_data_uri("c2VsZmll");
        assert_eq!(plain.as_str(), "c2VsZmll");
    }

    #[test]
    fn test_absent_input_encodes_to_absent() {
        assert!(encode_optional(None).is_none());
        assert!(encode_optional(Some(b"id-front".as_slice())).is_some());
    }

    #[test]
    fn test_empty_input_is_distinct_from_absent() {
        let payload = encode_optional(Some(b"".as_slice())).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_payload_serializes_as_bare_string() {
        let payload = ImagePayload::encode(b"id");
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, "\"aWQ=\"");
    }
}
