//! Provider backed by proxy list sources.

use crate::provider::ProxyProvider;
use crate::proxy::ManagedProxy;
use crate::state::LifecycleState;
use crate::utils;

use futures::future;
use log::{info, warn};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A provider loading its proxies from URLs or local files.
///
/// Call [`SourceProvider::refresh`] to (re)load the lists, then
/// [`crate::ProxyPool::refill`] so the pool picks up the change.
pub struct SourceProvider {
    name: String,
    sources: Vec<String>,
    proxies: RwLock<Vec<Arc<ManagedProxy>>>,
}

impl SourceProvider {
    pub fn new(name: impl Into<String>, sources: Vec<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            proxies: RwLock::new(Vec::new()),
        }
    }

    /// Source URLs or paths.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Reload every source and return how many proxies the provider now holds.
    ///
    /// Sources that fail are skipped. Proxies already known keep their
    /// lifecycle state, new ones start out pristine.
    pub async fn refresh(&self) -> usize {
        info!("Refreshing provider {} from {} sources", self.name, self.sources.len());

        let results = future::join_all(
            self.sources
                .iter()
                .map(|source| utils::fetch_proxies_from_source(source)),
        )
        .await;

        let mut seen = HashSet::new();
        let mut addresses = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(list) => {
                    info!("Fetched {} proxies from {}", list.len(), source);
                    addresses.extend(list.into_iter().filter(|a| seen.insert(a.clone())));
                }
                Err(e) => {
                    warn!("Provider {}: {}", self.name, e);
                }
            }
        }

        let mut proxies = self.proxies.write();
        let known: HashMap<String, Arc<ManagedProxy>> = proxies
            .drain(..)
            .map(|p| (p.address().to_string(), p))
            .collect();
        *proxies = addresses
            .into_iter()
            .map(|address| match known.get(&address) {
                Some(existing) => Arc::clone(existing),
                None => Arc::new(ManagedProxy::with_state(address, LifecycleState::Pristine)),
            })
            .collect();

        info!("Provider {} holds {} unique proxies", self.name, proxies.len());
        proxies.len()
    }
}

impl ProxyProvider for SourceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn proxies(&self) -> Vec<Arc<ManagedProxy>> {
        self.proxies.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn list_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn source_of(file: &NamedTempFile) -> String {
        file.path().to_string_lossy().into_owned()
    }

    #[test]
    fn test_refresh_from_files() {
        let first = list_file("1.1.1.1:1080\n2.2.2.2:1080\n");
        let second = list_file("socks5://2.2.2.2:1080\n3.3.3.3:1080\n");
        let provider = SourceProvider::new(
            "files",
            vec![
                source_of(&first),
                source_of(&second),
                "/nonexistent/proxies.txt".to_string(),
            ],
        );

        assert!(provider.proxies().is_empty());
        assert_eq!(tokio_test::block_on(provider.refresh()), 3);

        let proxies = provider.proxies();
        let addresses: Vec<&str> = proxies.iter().map(|p| p.address()).collect();
        assert_eq!(
            addresses,
            vec!["socks5://1.1.1.1:1080", "socks5://2.2.2.2:1080", "socks5://3.3.3.3:1080"]
        );
        assert_eq!(proxies[0].state().unwrap(), LifecycleState::Pristine);
    }

    #[test]
    fn test_refresh_keeps_known_states() {
        let file = list_file("1.1.1.1:1080\n");
        let provider = SourceProvider::new("file", vec![source_of(&file)]);
        tokio_test::block_on(provider.refresh());
        provider.proxies()[0].mark_broken();

        std::fs::write(file.path(), "4.4.4.4:1080\n1.1.1.1:1080\n").unwrap();
        assert_eq!(tokio_test::block_on(provider.refresh()), 2);

        let proxies = provider.proxies();
        assert_eq!(proxies[0].state().unwrap(), LifecycleState::Pristine);
        assert_eq!(proxies[1].address(), "socks5://1.1.1.1:1080");
        assert_eq!(proxies[1].state().unwrap(), LifecycleState::Broken);
    }
}
