//! Cluster Integration Tests
//!
//! Runs a real leader plus followers on loopback ports and drives them
//! through client stubs: routing through followers, mutual exclusion across
//! nodes, and best-effort cache convergence.

use lock_cluster::client::LockClient;
use lock_cluster::registry::memory::LockRegistry;
use lock_cluster::server::connection::LockNode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

struct Cluster {
    leader_addr: SocketAddr,
    follower_addrs: Vec<SocketAddr>,
    follower_registries: Vec<Arc<LockRegistry>>,
}

/// Binds the leader first (its address is needed by the followers), then the
/// followers (their addresses are needed by the leader), then starts
/// everything with the follower set frozen.
async fn start_cluster(follower_count: usize) -> Cluster {
    let any: SocketAddr = "127.0.0.1:0".parse().unwrap();

    let mut leader = LockNode::new_leader(any).await.unwrap();
    let leader_addr = leader.local_addr().unwrap();

    let mut follower_addrs = Vec::new();
    let mut follower_registries = Vec::new();
    for _ in 0..follower_count {
        let follower = LockNode::new_follower(any, leader_addr).await.unwrap();
        let addr = follower.local_addr().unwrap();
        leader.add_follower(addr);
        follower_addrs.push(addr);
        follower_registries.push(follower.registry());
        follower.start();
    }
    leader.start();

    Cluster {
        leader_addr,
        follower_addrs,
        follower_registries,
    }
}

/// Generous bound for fire-and-forget replication over loopback.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_lock_lifecycle_through_leader() {
    let cluster = start_cluster(0).await;
    let a = LockClient::with_id(cluster.leader_addr, "client-a");
    let b = LockClient::with_id(cluster.leader_addr, "client-b");

    assert!(a.preempt("r").await.unwrap());
    assert!(!b.preempt("r").await.unwrap());
    assert!(a.release("r").await.unwrap());
    assert!(a.check("r").await.unwrap().is_none());
    // B never owned it; releasing is rejected, not a state change.
    assert!(!b.release("r").await.unwrap());
}

#[tokio::test]
async fn test_preempt_through_follower_matches_leader_verdict() {
    let cluster = start_cluster(2).await;
    let via_follower = LockClient::with_id(cluster.follower_addrs[0], "client-a");
    let via_leader = LockClient::with_id(cluster.leader_addr, "client-b");

    // Forwarded acquisition wins on the leader's registry.
    assert!(via_follower.preempt("resource1").await.unwrap());
    assert_eq!(
        via_leader.check("resource1").await.unwrap().as_deref(),
        Some("client-a")
    );

    // Contention seen identically no matter which node receives it.
    assert!(!via_leader.preempt("resource1").await.unwrap());
    let via_other_follower = LockClient::with_id(cluster.follower_addrs[1], "client-c");
    assert!(!via_other_follower.preempt("resource1").await.unwrap());
}

#[tokio::test]
async fn test_follower_caches_converge_after_mutations() {
    let cluster = start_cluster(2).await;
    let client = LockClient::with_id(cluster.leader_addr, "client-a");

    assert!(client.preempt("resource1").await.unwrap());
    settle().await;

    // Checks routed through any node agree with the leader.
    for addr in &cluster.follower_addrs {
        let reader = LockClient::new(*addr);
        assert_eq!(
            reader.check("resource1").await.unwrap().as_deref(),
            Some("client-a")
        );
    }
    // And each follower's own cached registry has converged.
    for registry in &cluster.follower_registries {
        assert_eq!(registry.check("resource1").as_deref(), Some("client-a"));
    }

    assert!(client.release("resource1").await.unwrap());
    settle().await;

    for registry in &cluster.follower_registries {
        assert!(registry.check("resource1").is_none());
    }
}

#[tokio::test]
async fn test_concurrent_preempt_across_nodes_has_one_winner() {
    let cluster = start_cluster(1).await;
    let via_leader = LockClient::with_id(cluster.leader_addr, "client-a");
    let via_follower = LockClient::with_id(cluster.follower_addrs[0], "client-b");

    let (a_won, b_won) = tokio::join!(via_leader.preempt("shared"), via_follower.preempt("shared"));
    let a_won = a_won.unwrap();
    let b_won = b_won.unwrap();

    assert!(a_won ^ b_won, "Exactly one concurrent preempt must succeed");

    let winner = if a_won { "client-a" } else { "client-b" };
    assert_eq!(
        via_leader.check("shared").await.unwrap().as_deref(),
        Some(winner)
    );
}

#[tokio::test]
async fn test_release_authority_enforced_through_followers() {
    let cluster = start_cluster(2).await;
    let owner = LockClient::with_id(cluster.follower_addrs[0], "client-a");
    let intruder = LockClient::with_id(cluster.follower_addrs[1], "client-b");

    assert!(owner.preempt("resource").await.unwrap());
    assert!(!intruder.release("resource").await.unwrap());

    // Still owned by A everywhere that matters.
    let leader_view = LockClient::new(cluster.leader_addr);
    assert_eq!(
        leader_view.check("resource").await.unwrap().as_deref(),
        Some("client-a")
    );

    assert!(owner.release("resource").await.unwrap());
    assert!(leader_view.check("resource").await.unwrap().is_none());
}

#[tokio::test]
async fn test_each_client_cycles_its_own_lock() {
    // One client per node, each working a distinct lock, as in the original
    // demonstration flow.
    let cluster = start_cluster(2).await;
    let mut addrs = cluster.follower_addrs.clone();
    addrs.push(cluster.leader_addr);

    for (i, addr) in addrs.iter().enumerate() {
        let client = LockClient::new(*addr);
        let lock_name = format!("resource{}", i + 1);

        assert!(client.preempt(&lock_name).await.unwrap());
        assert_eq!(
            LockClient::new(cluster.leader_addr)
                .check(&lock_name)
                .await
                .unwrap()
                .as_deref(),
            Some(client.client_id())
        );
        assert!(client.release(&lock_name).await.unwrap());

        // The client may be attached to a follower, whose cached view only
        // reflects the release once the notification lands.
        settle().await;
        assert!(client.check(&lock_name).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_leader_survives_dead_follower() {
    // Reserve an address, then start a cluster whose leader replicates to it.
    let reserved = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = reserved.local_addr().unwrap();
    drop(reserved);

    let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let mut leader = LockNode::new_leader(any).await.unwrap();
    let leader_addr = leader.local_addr().unwrap();
    leader.add_follower(dead_addr);
    leader.start();

    let client = LockClient::with_id(leader_addr, "client-a");

    // Replication failure never blocks or fails the client's request.
    assert!(client.preempt("resource1").await.unwrap());
    assert!(client.release("resource1").await.unwrap());
}
