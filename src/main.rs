use lock_cluster::server::connection::LockNode;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> [--leader <addr:port>] [--follower <addr:port>]...",
            args[0]
        );
        eprintln!(
            "Example (leader):   {} --bind 127.0.0.1:65432 --follower 127.0.0.1:65433 --follower 127.0.0.1:65434",
            args[0]
        );
        eprintln!(
            "Example (follower): {} --bind 127.0.0.1:65433 --leader 127.0.0.1:65432",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut leader_addr: Option<SocketAddr> = None;
    let mut follower_addrs: Vec<SocketAddr> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--leader" => {
                leader_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--follower" => {
                follower_addrs.push(args[i + 1].parse()?);
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");

    // A node is a follower iff it was pointed at a leader.
    let node = match leader_addr {
        Some(leader) => {
            if !follower_addrs.is_empty() {
                anyhow::bail!("--follower is only valid without --leader");
            }
            tracing::info!("Starting follower on {} (leader at {})", bind_addr, leader);
            LockNode::new_follower(bind_addr, leader).await?
        }
        None => {
            tracing::info!(
                "Starting leader on {} with {} follower(s)",
                bind_addr,
                follower_addrs.len()
            );
            let mut node = LockNode::new_leader(bind_addr).await?;
            for addr in follower_addrs {
                node.add_follower(addr);
            }
            node
        }
    };

    node.start().await?;

    Ok(())
}
