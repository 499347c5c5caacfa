use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use super::router::RequestRouter;
use super::types::Role;
use crate::protocol::codec;
use crate::protocol::types::MAX_MESSAGE_SIZE;
use crate::registry::memory::LockRegistry;
use crate::replication::channel::ReplicationChannel;

/// One node of the lock service: a bound listener, a role, and the node's
/// single registry instance.
///
/// The listener is bound eagerly so `local_addr` resolves port-0 binds before
/// traffic starts; `start` freezes the configuration and spawns the accept
/// loop.
pub struct LockNode {
    listener: TcpListener,
    role: Role,
    registry: Arc<LockRegistry>,
}

impl LockNode {
    pub async fn new_leader(bind_addr: SocketAddr) -> Result<Self> {
        Self::bind(bind_addr, Role::Leader { followers: vec![] }).await
    }

    pub async fn new_follower(bind_addr: SocketAddr, leader_addr: SocketAddr) -> Result<Self> {
        Self::bind(bind_addr, Role::Follower { leader_addr }).await
    }

    async fn bind(bind_addr: SocketAddr, role: Role) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr).await?;
        Ok(Self {
            listener,
            role,
            registry: Arc::new(LockRegistry::new()),
        })
    }

    /// The address the node actually listens on.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the node's registry; followers stay readable through it
    /// after `start` consumes the node.
    pub fn registry(&self) -> Arc<LockRegistry> {
        self.registry.clone()
    }

    /// Registers a follower address on a leader. Must happen before `start`;
    /// the set is frozen once traffic begins.
    pub fn add_follower(&mut self, addr: SocketAddr) {
        match &mut self.role {
            Role::Leader { followers } => followers.push(addr),
            Role::Follower { .. } => {
                tracing::warn!("Ignoring add_follower({}) on a follower node", addr);
            }
        }
    }

    /// Consumes the node and spawns its accept loop.
    pub fn start(self) -> JoinHandle<()> {
        let role_name = self.role.name();
        match self.listener.local_addr() {
            Ok(addr) => tracing::info!("{} node listening on {}", role_name, addr),
            Err(e) => tracing::warn!("{} node listening on unknown address: {}", role_name, e),
        }

        let router = Arc::new(match self.role {
            Role::Leader { followers } => {
                tracing::info!("Replicating to {} follower(s)", followers.len());
                RequestRouter::leader(self.registry, ReplicationChannel::new(followers))
            }
            Role::Follower { leader_addr } => {
                tracing::info!("Forwarding authoritative requests to {}", leader_addr);
                RequestRouter::follower(self.registry, leader_addr)
            }
        });

        let listener = self.listener;
        tokio::spawn(async move {
            accept_loop(listener, router).await;
        })
    }
}

async fn accept_loop(listener: TcpListener, router: Arc<RequestRouter>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::debug!("Accepted connection from {}", peer);
                let router = router.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, router).await {
                        tracing::warn!("Connection from {} ended with error: {}", peer, e);
                    }
                });
            }
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

/// Serves one connection for its lifetime.
///
/// Requests are read one at a time into the fixed window and answered
/// strictly in arrival order. Undecodable payloads get an in-band error
/// answer and the loop continues; an empty read means the peer is done.
async fn handle_connection(mut stream: TcpStream, router: Arc<RequestRouter>) -> Result<()> {
    let mut buf = vec![0u8; MAX_MESSAGE_SIZE];

    loop {
        let len = stream.read(&mut buf).await?;
        if len == 0 {
            return Ok(());
        }

        let response = match codec::decode_request(&buf[..len]) {
            Ok(request) => router.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Undecodable request payload: {:?}", e);
                e.to_response()
            }
        };

        let encoded = serde_json::to_vec(&response)?;
        stream.write_all(&encoded).await?;
    }
}
