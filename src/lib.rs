//! Distributed Lock Service Library
//!
//! This library crate defines the core modules of a leader/follower lock
//! service. It serves as the foundation for the binary executable
//! (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`protocol`**: The wire contract. JSON requests/responses with a closed
//!   action set, decoded within a fixed-size message window.
//! - **`registry`**: The lock-ownership table. The leader's copy is
//!   authoritative; follower copies are best-effort caches.
//! - **`replication`**: Fire-and-forget propagation of the leader's ownership
//!   decisions to every follower.
//! - **`server`**: The node itself. Accepts connections, routes each request
//!   per the node's role, and relays follower traffic to the leader.
//! - **`client`**: The client stub. One short-lived connection per call, also
//!   reused as the crate's outbound wire helper between nodes.

pub mod client;
pub mod protocol;
pub mod registry;
pub mod replication;
pub mod server;
