use std::net::SocketAddr;
use std::sync::Arc;

use crate::client;
use crate::protocol::types::{Action, Request, Response};
use crate::registry::memory::LockRegistry;
use crate::replication::channel::ReplicationChannel;

enum RouterMode {
    Leader { replication: ReplicationChannel },
    Follower { leader_addr: SocketAddr },
}

/// Decides the disposition of every decoded request according to the node's
/// role: apply locally, or forward to the leader and relay its answer.
pub struct RequestRouter {
    registry: Arc<LockRegistry>,
    mode: RouterMode,
}

impl RequestRouter {
    pub fn leader(registry: Arc<LockRegistry>, replication: ReplicationChannel) -> Self {
        Self {
            registry,
            mode: RouterMode::Leader { replication },
        }
    }

    pub fn follower(registry: Arc<LockRegistry>, leader_addr: SocketAddr) -> Self {
        Self {
            registry,
            mode: RouterMode::Follower { leader_addr },
        }
    }

    pub async fn dispatch(&self, request: Request) -> Response {
        match &self.mode {
            RouterMode::Leader { replication } => self.dispatch_leader(request, replication),
            RouterMode::Follower { leader_addr } => {
                self.dispatch_follower(request, *leader_addr).await
            }
        }
    }

    /// Precondition checks applied on the leader before any dispatch.
    ///
    /// A failed check answers `Invalid operation` and leaves the registry
    /// untouched. The ownership test for `release` is re-checked atomically
    /// inside the registry, so a concurrent change between validation and
    /// dispatch degrades to an ordinary `result: false`.
    fn is_valid_operation(&self, request: &Request) -> bool {
        match request.action {
            Action::Check => true,
            Action::Preempt => request.client_id.is_some(),
            Action::Release => match (&request.client_id, self.registry.check(&request.lock_name))
            {
                (Some(requester), Some(owner)) => *requester == owner,
                _ => false,
            },
            // An update may carry a null owner (a release notification), so
            // there is nothing to pre-validate.
            Action::Update => true,
        }
    }

    fn dispatch_leader(&self, request: Request, replication: &ReplicationChannel) -> Response {
        if !self.is_valid_operation(&request) {
            tracing::debug!(
                "Rejected {:?} of '{}' as invalid",
                request.action,
                request.lock_name
            );
            return Response::error("Invalid operation");
        }

        match request.action {
            Action::Preempt => {
                let Some(client_id) = request.client_id else {
                    return Response::error("Invalid operation");
                };
                let granted = self.registry.preempt(&request.lock_name, &client_id);
                if granted {
                    tracing::info!("Lock '{}' granted to {}", request.lock_name, client_id);
                    replication.broadcast(&request.lock_name, Some(&client_id));
                }
                Response::ack(granted)
            }
            Action::Release => {
                let Some(client_id) = request.client_id else {
                    return Response::error("Invalid operation");
                };
                let released = self.registry.release(&request.lock_name, &client_id);
                if released {
                    tracing::info!("Lock '{}' released by {}", request.lock_name, client_id);
                    replication.broadcast(&request.lock_name, None);
                }
                Response::ack(released)
            }
            Action::Check => Response::owner(self.registry.check(&request.lock_name)),
            Action::Update => {
                // Not expected from clients in normal operation; it bypasses
                // the preempt/release authority checks.
                tracing::warn!(
                    "Applying externally supplied update for '{}'",
                    request.lock_name
                );
                self.registry
                    .apply_update(&request.lock_name, request.client_id.as_deref());
                Response::ack(true)
            }
        }
    }

    async fn dispatch_follower(&self, request: Request, leader_addr: SocketAddr) -> Response {
        match request.action {
            // The one action a follower decides unilaterally: landing a
            // replication notification in its cache.
            Action::Update => {
                tracing::debug!(
                    "Applying replicated update for '{}' (owner: {:?})",
                    request.lock_name,
                    request.client_id
                );
                self.registry
                    .apply_update(&request.lock_name, request.client_id.as_deref());
                Response::ack(true)
            }
            // Everything else is forwarded verbatim; the leader is the sole
            // authority and its answer is relayed unchanged.
            _ => match client::send_request(leader_addr, &request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Failed to forward request to leader {}: {}", leader_addr, e);
                    Response::error("Leader unreachable")
                }
            },
        }
    }
}
