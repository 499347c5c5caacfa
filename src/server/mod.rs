//! Lock Server Module
//!
//! The node-side half of the service: accepting connections, decoding
//! requests, and deciding who answers them.
//!
//! ## Core Mechanisms
//! - **Roles**: A single leader owns every lock decision; followers keep a
//!   cached replica and forward client mutations to the leader verbatim.
//! - **Routing**: `RequestRouter` validates and dispatches per role. The only
//!   action a follower decides unilaterally is applying an `update`.
//! - **Connections**: One task per accepted connection; requests on a
//!   connection are answered strictly in arrival order, and protocol errors
//!   are answered in-band rather than by dropping the connection.

pub mod connection;
pub mod router;
pub mod types;
