use std::net::SocketAddr;

use crate::client;
use crate::protocol::types::{Action, Request};

/// Leader-to-follower propagation of ownership changes.
///
/// The follower set is fixed before the leader starts accepting traffic, so
/// broadcasts read it without further synchronization.
pub struct ReplicationChannel {
    followers: Vec<SocketAddr>,
}

impl ReplicationChannel {
    pub fn new(followers: Vec<SocketAddr>) -> Self {
        Self { followers }
    }

    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    /// Broadcasts an ownership change to every follower, one fire-and-forget
    /// task per follower. `owner` is `None` when the change is a release.
    ///
    /// Failures are logged and dropped; the caller's response to its client
    /// must never wait on a follower.
    pub fn broadcast(&self, lock_name: &str, owner: Option<&str>) {
        for follower in &self.followers {
            let addr = *follower;
            let notification = Request {
                action: Action::Update,
                lock_name: lock_name.to_string(),
                client_id: owner.map(|client_id| client_id.to_string()),
            };

            tokio::spawn(async move {
                match client::send_request(addr, &notification).await {
                    Ok(_) => {
                        tracing::debug!(
                            "Replicated '{}' to follower {}",
                            notification.lock_name,
                            addr
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Failed to replicate to follower {}: {}", addr, e);
                    }
                }
            });
        }
    }
}
