//! Example: Taking a reboot slot through etcd
//!
//! Run with: `cargo run --example etcd_semaphore -- <node-id>`
//!
//! Requires an etcd server with the v2 API enabled. Set ETCD_ENDPOINTS
//! (comma-separated) or modify the endpoint below.

use rebootlock::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let endpoints: Vec<String> = std::env::var("ETCD_ENDPOINTS")
        .unwrap_or_else(|_| "http://127.0.0.1:2379".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();
    let node_id = std::env::args().nth(1).unwrap_or_else(|| "demo-node".to_string());

    println!("Connecting to etcd at {endpoints:?}...");
    let client = rebootlock::connect(endpoints.as_slice(), 1).await?;

    // Fetch, modify, commit; start over whenever another node wins the race
    let version = loop {
        let mut semaphore = client.fetch().await?;
        println!(
            "Semaphore at version {}: {}/{} held {:?}",
            semaphore.version().map(|v| v.to_string()).unwrap_or_default(),
            semaphore.holders.len(),
            semaphore.max_holders,
            semaphore.holders
        );

        if semaphore.holders.contains(&node_id) {
            println!("{node_id} already holds a slot");
            return Ok(());
        }
        if semaphore.holders.len() >= semaphore.max_holders as usize {
            println!("No free slot, try again later");
            return Ok(());
        }

        semaphore.holders.push(node_id.clone());
        match client.commit_update(&semaphore).await {
            Ok(version) => break version,
            Err(e) if e.is_conflict() => {
                println!("Lost a race, retrying with fresh state");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    };
    println!("{node_id} took a slot (version {version})");

    // Give it back
    loop {
        let mut semaphore = client.fetch().await?;
        semaphore.holders.retain(|h| h != &node_id);
        match client.commit_update(&semaphore).await {
            Ok(_) => break,
            Err(e) if e.is_conflict() => continue,
            Err(e) => return Err(e.into()),
        }
    }
    println!("{node_id} released its slot");

    Ok(())
}
