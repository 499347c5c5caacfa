//! Lock Registry Module
//!
//! The in-memory table of lock ownership. On the leader it is the single
//! source of truth; on followers it is a best-effort cache fed by replication
//! notifications.
//!
//! ## Core Concepts
//! - **Mutual exclusion**: At most one client id is recorded per lock name;
//!   concurrent acquisition attempts for the same name serialize on the
//!   table's per-key locking, so exactly one wins.
//! - **Authority**: A release only succeeds for the recorded owner. Updates
//!   bypass that check; they exist to apply decisions the leader already made.
//! - **Uniform discipline**: Every registry instance serializes mutations the
//!   same way regardless of role, so concurrent replication notifications
//!   cannot corrupt a follower's cache either.

pub mod memory;
