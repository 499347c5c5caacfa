use serde::{Deserialize, Serialize};

/// Fixed receive window for every socket read in the system.
///
/// Payloads larger than this are truncated and fail to decode. The message
/// shapes are small key/value objects, well under this bound.
pub const MAX_MESSAGE_SIZE: usize = 1024;

/// The closed set of recognized request kinds.
///
/// Unrecognized tags fail to decode and are answered as invalid operations;
/// there is no fall-through arm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Acquire a lock if nobody owns it.
    Preempt,
    /// Give up a lock the requester currently owns.
    Release,
    /// Read the current owner without touching state.
    Check,
    /// Leader-to-follower ownership notification; overwrites unconditionally.
    Update,
}

/// One client or inter-node request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub action: Action,
    pub lock_name: String,
    /// Requesting client for `preempt`/`release`; the new owner for `update`
    /// (`None` clears the lock); absent for `check`.
    #[serde(default)]
    pub client_id: Option<String>,
}

/// One response, mirroring the two reply shapes of the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    /// Outcome of a mutation (or a structured error).
    Ack {
        result: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Outcome of a `check`: the owning client id, or `None` when unlocked.
    Owner { owner: Option<String> },
}

impl Response {
    pub fn ack(result: bool) -> Self {
        Response::Ack {
            result,
            reason: None,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Response::Ack {
            result: false,
            reason: Some(reason.into()),
        }
    }

    pub fn owner(owner: Option<String>) -> Self {
        Response::Owner { owner }
    }
}
