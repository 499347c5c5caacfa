use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use uuid::Uuid;

use crate::protocol::types::{Action, MAX_MESSAGE_SIZE, Request, Response};

/// Sends one request over a fresh connection and reads back one response.
///
/// The response is read in a single pass into the fixed window, matching the
/// protocol's message-size bound.
pub async fn send_request(addr: SocketAddr, request: &Request) -> Result<Response> {
    let mut stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to {}", addr))?;

    let payload = serde_json::to_vec(request)?;
    stream.write_all(&payload).await?;

    let mut buf = vec![0u8; MAX_MESSAGE_SIZE];
    let len = stream.read(&mut buf).await?;
    if len == 0 {
        anyhow::bail!("Connection to {} closed before a response arrived", addr);
    }

    let response = serde_json::from_slice(&buf[..len])
        .with_context(|| format!("Undecodable response from {}", addr))?;

    Ok(response)
}

/// A client identity bound to one node of the cluster.
///
/// The node may be the leader or any follower; mutations issued through a
/// follower are forwarded to the leader transparently.
pub struct LockClient {
    server_addr: SocketAddr,
    client_id: String,
}

impl LockClient {
    /// Creates a client with a fresh random identity.
    pub fn new(server_addr: SocketAddr) -> Self {
        Self::with_id(server_addr, Uuid::new_v4().to_string())
    }

    /// Creates a client with a caller-chosen identity.
    pub fn with_id(server_addr: SocketAddr, client_id: impl Into<String>) -> Self {
        Self {
            server_addr,
            client_id: client_id.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Attempts to acquire the lock. `Ok(false)` means somebody else holds it
    /// (or the node reported a structured failure).
    pub async fn preempt(&self, lock_name: &str) -> Result<bool> {
        self.send_ack(Action::Preempt, lock_name).await
    }

    /// Gives the lock up. `Ok(false)` means this client was not the owner.
    pub async fn release(&self, lock_name: &str) -> Result<bool> {
        self.send_ack(Action::Release, lock_name).await
    }

    /// Reads the current owner. A follower forwards this to the leader like
    /// any other client request, so the answer is authoritative either way.
    pub async fn check(&self, lock_name: &str) -> Result<Option<String>> {
        let request = Request {
            action: Action::Check,
            lock_name: lock_name.to_string(),
            client_id: None,
        };

        match send_request(self.server_addr, &request).await? {
            Response::Owner { owner } => Ok(owner),
            Response::Ack { reason, .. } => anyhow::bail!(
                "Check of '{}' rejected: {}",
                lock_name,
                reason.unwrap_or_else(|| "no reason given".to_string())
            ),
        }
    }

    async fn send_ack(&self, action: Action, lock_name: &str) -> Result<bool> {
        let request = Request {
            action,
            lock_name: lock_name.to_string(),
            client_id: Some(self.client_id.clone()),
        };

        match send_request(self.server_addr, &request).await? {
            Response::Ack { result, .. } => Ok(result),
            Response::Owner { .. } => {
                anyhow::bail!("Unexpected ownership response to a mutation")
            }
        }
    }
}
