//! Message encoding and decoding.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ProtocolError;

/// Converts protocol messages to and from text frames.
///
/// The transport layer carries opaque text; a `Codec` gives that text
/// meaning. [`JsonCodec`] is the stock implementation, but the trait keeps
/// the door open for alternative encodings without touching the server.
pub trait Codec: Send + Sync + 'static {
    /// Encodes a message into a text frame.
    fn encode<T: Serialize>(&self, message: &T) -> Result<String, ProtocolError>;

    /// Decodes a message from a text frame.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// JSON codec backed by `serde_json`.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, message: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(message).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::types::{ClientEvent, RequestType, ServerEvent, UserId};

    #[test]
    fn test_json_codec_decodes_client_event() {
        let codec = JsonCodec;
        let event: ClientEvent = codec
            .decode(r#"{"request_type": "ping", "user_id": "u1"}"#)
            .unwrap();
        assert_eq!(event.request_type, Some(RequestType::Ping));
        assert_eq!(event.user_id, Some(UserId("u1".into())));
    }

    #[test]
    fn test_json_codec_decode_rejects_malformed_text() {
        let codec = JsonCodec;
        let result: Result<ClientEvent, _> = codec.decode("not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_encode_decode_server_event() {
        let codec = JsonCodec;
        let event = ServerEvent::LockOut { locked_out: false };
        let text = codec.encode(&event).unwrap();
        let decoded: ServerEvent = codec.decode(&text).unwrap();
        assert_eq!(event, decoded);
    }
}
