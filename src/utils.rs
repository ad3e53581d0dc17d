//! Utility functions for loading proxy lists.

use crate::error::SourceError;

use url::Url;

/// Fetch and parse a list of proxies from a URL or file path.
pub(crate) async fn fetch_proxies_from_source(source: &str) -> Result<Vec<String>, SourceError> {
    let content = if source.starts_with("http") {
        let fetch = |error| SourceError::Fetch {
            source_name: source.to_string(),
            error,
        };
        let response = reqwest::get(source).await.map_err(fetch)?;
        response.text().await.map_err(fetch)?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|error| SourceError::Read {
                source_name: source.to_string(),
                error,
            })?
    };
    Ok(parse_proxy_list(&content))
}

/// Parse the text content into proxy URLs.
///
/// `scheme://host:port` lines are kept as they are, bare `host:port` lines
/// are read as SOCKS5 proxies.
pub(crate) fn parse_proxy_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let candidate = if line.contains("://") {
                line.to_string()
            } else if line.contains(':') {
                format!("socks5://{}", line)
            } else {
                return None;
            };
            match Url::parse(&candidate) {
                Ok(url) if url.host_str().is_some() => Some(candidate),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proxy_list() {
        let content = "\
# free list
socks5://1.2.3.4:1080
  5.6.7.8:9050
http://proxy.local:3128

not-a-proxy
";
        assert_eq!(
            parse_proxy_list(content),
            vec![
                "socks5://1.2.3.4:1080",
                "socks5://5.6.7.8:9050",
                "http://proxy.local:3128",
            ]
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = tokio_test::block_on(fetch_proxies_from_source("/nonexistent/proxies.txt"));
        assert!(matches!(result, Err(SourceError::Read { .. })));
    }
}
