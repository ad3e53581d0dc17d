use proxy_lifecycle_pool::{
    LifecycleState, PoolError, ProxyPool, ProxyPoolConfig, ProxyProvider, StaticProvider,
    WarningKind,
};
use std::sync::Arc;
use std::thread;

fn provider(name: &str, count: usize, state: LifecycleState) -> Arc<dyn ProxyProvider> {
    let addresses = (0..count).map(|i| format!("socks5://{}.example:{}", name, 1080 + i));
    Arc::new(StaticProvider::from_addresses(name, addresses, state))
}

fn config() -> ProxyPoolConfig {
    ProxyPoolConfig::builder().state_threshold(250).build()
}

#[test]
fn two_providers_then_disable_first() {
    let pool = ProxyPool::new(
        [
            provider("first", 2, LifecycleState::Ready),
            provider("second", 3, LifecycleState::Ready),
        ],
        config(),
    )
    .unwrap();
    assert_eq!(pool.len(), 5);

    let proxy = pool.select_one().unwrap();
    assert_eq!(proxy.health().unwrap(), 100);

    assert_eq!(pool.disable("first"), None);
    assert_eq!(pool.len(), 3);
    for _ in 0..20 {
        let proxy = pool.select_one().unwrap();
        assert!(proxy.address().starts_with("socks5://second."));
        assert!(proxy.health().unwrap() < 250);
    }
}

#[test]
fn no_providers_means_empty_pool() {
    let pool = ProxyPool::new(Vec::new(), config()).unwrap();
    assert_eq!(pool.select_one().unwrap_err(), PoolError::PoolEmpty);
}

#[test]
fn all_broken_means_none_available() {
    let pool = ProxyPool::new(
        [
            provider("first", 2, LifecycleState::Broken),
            provider("second", 3, LifecycleState::Broken),
        ],
        config(),
    )
    .unwrap();
    assert_eq!(
        pool.select_one().unwrap_err(),
        PoolError::NoneAvailable { total: 5 }
    );
}

#[test]
fn disabling_twice_is_a_warning_both_times() {
    let pool = ProxyPool::new([provider("first", 2, LifecycleState::Ready)], config()).unwrap();
    pool.disable("first");

    for _ in 0..2 {
        let warning = pool.disable("first").unwrap();
        assert_eq!(warning.kind, WarningKind::AlreadyDisabled);
        assert!(pool.is_empty());
    }
    for _ in 0..2 {
        let warning = pool.disable("never").unwrap();
        assert_eq!(warning.kind, WarningKind::Unknown);
    }
    assert_eq!(pool.disabled_providers(), vec!["first".to_string()]);
}

#[test]
fn concurrent_issue_never_hands_out_ineligible_proxies() {
    let config = ProxyPoolConfig::builder().state_threshold(200).build();
    let pool = Arc::new(
        ProxyPool::new(
            [
                provider("first", 10, LifecycleState::Ready),
                provider("second", 10, LifecycleState::Ready),
            ],
            config,
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut issued = Vec::new();
                while let Ok(proxy) = pool.issue() {
                    issued.push(proxy.address().to_string());
                }
                issued
            })
        })
        .collect();

    let mut all: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(all.len(), 20);
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 20);
    assert_eq!(pool.stats().available, 0);
}
