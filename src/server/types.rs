use std::net::SocketAddr;

/// A node's position in the cluster, fixed at startup.
///
/// Only a leader carries a follower set; a follower instead knows where to
/// forward authoritative requests. There is no election and no role change at
/// runtime.
#[derive(Debug, Clone)]
pub enum Role {
    Leader { followers: Vec<SocketAddr> },
    Follower { leader_addr: SocketAddr },
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Leader { .. } => "leader",
            Role::Follower { .. } => "follower",
        }
    }
}
