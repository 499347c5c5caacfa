//! Lock Client Module
//!
//! The client-side stub for the lock service. Each call opens a short-lived
//! connection, sends one request, and reads one response. The same wire
//! helper backs follower-to-leader forwarding and leader-to-follower
//! replication, so every peer speaks the protocol identically.

pub mod stub;

pub use stub::{LockClient, send_request};
