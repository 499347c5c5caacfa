//! Lock Protocol Module
//!
//! Defines the wire contract spoken between clients and nodes, and between the
//! leader and its followers. Every message is a single human-readable JSON
//! object, read and written within a fixed-size window.
//!
//! ## Core Concepts
//! - **Requests**: A tagged `action` (`preempt`, `release`, `check`, `update`)
//!   plus the lock name and, for mutations, the requesting client id.
//! - **Responses**: Either an acknowledgment (`result` + optional `reason`) or
//!   an ownership report (`owner`).
//! - **Decoding**: Two-stage, so a node can tell garbage bytes apart from a
//!   well-formed object that is not a recognized request.

pub mod codec;
pub mod types;
