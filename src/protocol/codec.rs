use super::types::{Request, Response};

/// Why an inbound payload could not be turned into a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid JSON at all (including payloads truncated by the window).
    Malformed,
    /// Valid JSON that is not a recognized request shape (unknown action,
    /// missing fields, wrong types).
    Unrecognized,
}

impl DecodeError {
    /// The structured error answer sent back to the peer. Neither variant
    /// terminates the connection.
    pub fn to_response(self) -> Response {
        match self {
            DecodeError::Malformed => Response::error("Malformed request"),
            DecodeError::Unrecognized => Response::error("Invalid operation"),
        }
    }
}

/// Decodes one request payload in two stages so that garbage bytes and
/// well-formed-but-unrecognized objects get distinct answers.
pub fn decode_request(payload: &[u8]) -> Result<Request, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|_| DecodeError::Malformed)?;

    serde_json::from_value(value).map_err(|_| DecodeError::Unrecognized)
}
