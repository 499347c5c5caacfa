//! Replication Module
//!
//! Propagates the leader's ownership decisions to its followers.
//!
//! ## Core Mechanisms
//! - **Fan-out**: Every successful leader-side mutation produces one `update`
//!   notification per follower, each dispatched on its own task.
//! - **Best effort**: No retries, no acknowledgment tracking, no ordering
//!   across followers or across events. A follower that misses a notification
//!   simply serves stale reads until the next one lands; this is a designed
//!   property of the cache, not a failure mode to repair here.

pub mod channel;
