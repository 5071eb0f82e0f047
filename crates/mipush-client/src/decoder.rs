//! Response decoding.

use mipush_core::PushResult;
use serde::de::DeserializeOwned;

/// Decode a response body into `T`. Malformed bodies are errors, never defaults.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> PushResult<T> {
    Ok(serde_json::from_slice(body)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use mipush_core::{BatchStatusResult, PlainResult, PushError, SendResult};

    #[test]
    fn decodes_send_result() {
        let body = br#"{"result":"ok","trace_id":"t1","code":0,"data":{"id":"m1"},"description":"ok"}"#;
        let result: SendResult = decode(body).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.trace_id, "t1");
        assert_eq!(result.message_id(), Some("m1"));
    }

    #[test]
    fn decodes_error_envelope() {
        let body = br#"{"result":"error","code":22006,"reason":"bad","description":"invalid"}"#;
        let result: PlainResult = decode(body).unwrap();
        assert!(!result.is_ok());
        assert_eq!(result.code, 22006);
        assert_eq!(result.reason, "bad");
    }

    #[test]
    fn decodes_batch_status() {
        let body = br#"{"result":"ok","code":0,"data":{"data":[{"id":"a","delivered":3},{"id":"b"}]}}"#;
        let result: BatchStatusResult = decode(body).unwrap();
        let data = result.data.unwrap().data;
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].delivered, 3);
    }

    #[test]
    fn truncated_body_is_decode_error() {
        let body = br#"{"result":"ok","code":0,"data":{"id""#;
        assert_matches!(decode::<SendResult>(body), Err(PushError::Decode(_)));
    }

    #[test]
    fn empty_body_is_decode_error() {
        assert_matches!(decode::<PlainResult>(b""), Err(PushError::Decode(_)));
    }
}
