//! Simple example of using proxy-lifecycle-pool.

use proxy_lifecycle_pool::{
    LifecycleState, ProxyPool, ProxyPoolConfig, ProxyProvider, RedistributionStrategy,
    SourceProvider, StaticProvider,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Loading proxy lists...");

    // free socks5 proxy urls, format like `Free-Proxy`
    let free = Arc::new(SourceProvider::new(
        "free",
        vec![
            "https://cdn.jsdelivr.net/gh/dpangestuw/Free-Proxy@main/socks5_proxies.txt",
            "https://cdn.jsdelivr.net/gh/proxifly/free-proxy-list@main/proxies/protocols/socks5/data.txt",
        ],
    ));
    free.refresh().await;

    let local = Arc::new(StaticProvider::from_addresses(
        "local",
        ["socks5://127.0.0.1:1080"],
        LifecycleState::Ready,
    ));

    let config = ProxyPoolConfig::builder()
        .state_threshold(250)
        .exhaust_timeout(Duration::from_secs(30))
        .quarantine_timeout(Duration::from_secs(120))
        .redistribution(RedistributionStrategy::Rotate)
        .build();

    let providers = vec![local as Arc<dyn ProxyProvider>, free as Arc<dyn ProxyProvider>];
    let pool = ProxyPool::new(providers, config)?;
    println!("Pool: {:?}", pool.stats());

    let proxy = pool.issue()?;
    println!("Issued {} ({})", proxy.address(), proxy.state()?);

    let client = reqwest::Client::builder()
        .proxy(proxy.to_reqwest_proxy()?)
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get("https://httpbin.org/ip").send().await {
        Ok(response) => {
            println!("Status: {}", response.status());
            pool.release(&proxy);
        }
        Err(e) => {
            println!("Request failed: {}", e);
            pool.quarantine(&proxy);
        }
    }

    if let Some(warning) = pool.disable("local") {
        println!("{}", warning);
    }
    println!("Pool after disabling local: {:?}", pool.stats());

    Ok(())
}
