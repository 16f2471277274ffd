use log::{debug, warn};

use crate::cache::{MarkdownCache, MarkdownDocument};
use crate::env::Network;
use crate::error::FetchError;

/// Retrieves Markdown sources, serving from and filling a shared cache.
#[derive(Clone, Default)]
pub struct Fetcher {
    cache: MarkdownCache,
}

impl Fetcher {
    pub fn new(cache: MarkdownCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &MarkdownCache {
        &self.cache
    }

    fn store(&self, url: &str, raw: &str) -> MarkdownDocument {
        let document = MarkdownDocument::from_source(raw);
        if document.is_empty() {
            debug!("{url} has no content after front matter; not caching");
        } else {
            self.cache.insert(url, document.clone());
        }
        document
    }

    /// Non-blocking retrieval. Failures reach the caller and are not cached.
    pub async fn fetch<N: Network + ?Sized>(
        &self,
        network: &N,
        url: &str,
    ) -> Result<MarkdownDocument, FetchError> {
        if let Some(document) = self.cache.get(url) {
            debug!("cache hit for {url}");
            return Ok(document);
        }
        let raw = network.get(url).await.inspect_err(|err| {
            warn!("fetching {url} failed: {err}");
        })?;
        Ok(self.store(url, &raw))
    }

    /// Blocking retrieval for use inside a user gesture.
    ///
    /// `None` means the source is unavailable (network error, bad status, or
    /// an empty document) and the caller should degrade.
    pub fn fetch_blocking<N: Network + ?Sized>(
        &self,
        network: &N,
        url: &str,
    ) -> Option<MarkdownDocument> {
        if let Some(document) = self.cache.get(url) {
            debug!("cache hit for {url}");
            return Some(document);
        }
        // Stalls the page until the response arrives; see `Network::get_blocking`.
        match network.get_blocking(url) {
            Ok(raw) => Some(self.store(url, &raw)).filter(|doc| !doc.is_empty()),
            Err(err) => {
                warn!("blocking fetch of {url} failed: {err}");
                None
            }
        }
    }

    /// First cached document among `urls`, without touching the network.
    pub fn cached_any(&self, urls: &[String]) -> Option<MarkdownDocument> {
        urls.iter().find_map(|url| self.cache.get(url))
    }

    /// Tries every candidate against the cache first, then over the network in
    /// order, returning the first non-empty document.
    pub fn fetch_first_blocking<N: Network + ?Sized>(
        &self,
        network: &N,
        urls: &[String],
    ) -> Option<MarkdownDocument> {
        if let Some(document) = self.cached_any(urls) {
            return Some(document);
        }
        urls.iter()
            .find_map(|url| self.fetch_blocking(network, url))
    }

    pub async fn fetch_first<N: Network + ?Sized>(
        &self,
        network: &N,
        urls: &[String],
    ) -> Result<MarkdownDocument, FetchError> {
        if let Some(document) = self.cached_any(urls) {
            return Ok(document);
        }
        let mut last_err = FetchError::Network("no candidate URL".to_string());
        for url in urls {
            match self.fetch(network, url).await {
                Ok(document) if !document.is_empty() => return Ok(document),
                Ok(_) => last_err = FetchError::Body(format!("{url} is empty")),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEnv;
    use futures::executor::block_on;

    const URL: &str = "https://raw.githubusercontent.com/acme/widgets/main/docs/index.md";

    #[test]
    fn cache_hit_makes_no_network_call() {
        let env = MockEnv::new("/").with_response(URL, "---\ntitle: x\n---\nHello");
        let fetcher = Fetcher::default();

        let first = fetcher.fetch_blocking(&env, URL).unwrap();
        let second = fetcher.fetch_blocking(&env, URL).unwrap();
        let third = block_on(fetcher.fetch(&env, URL)).unwrap();

        assert_eq!(first.as_str(), "Hello");
        assert_eq!(second, first);
        assert_eq!(third, first);
        assert_eq!(env.network_calls(), 1);
    }

    #[test]
    fn async_fetch_fills_cache_for_blocking_path() {
        let env = MockEnv::new("/").with_response(URL, "Body\n");
        let fetcher = Fetcher::default();

        block_on(fetcher.fetch(&env, URL)).unwrap();
        assert_eq!(fetcher.fetch_blocking(&env, URL).unwrap().as_str(), "Body");
        assert_eq!(env.network_calls(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let env = MockEnv::new("/").with_failure(URL, FetchError::Status(404));
        let fetcher = Fetcher::default();

        assert_eq!(block_on(fetcher.fetch(&env, URL)), Err(FetchError::Status(404)));
        assert!(fetcher.fetch_blocking(&env, URL).is_none());
        assert!(fetcher.cache().is_empty());
        assert_eq!(env.network_calls(), 2);
    }

    #[test]
    fn front_matter_only_document_counts_as_unavailable() {
        let env = MockEnv::new("/").with_response(URL, "---\ntitle: x\n---\n");
        let fetcher = Fetcher::default();
        assert!(fetcher.fetch_blocking(&env, URL).is_none());
        assert!(!fetcher.cache().contains(URL));
    }

    #[test]
    fn cached_later_candidate_beats_network_for_earlier_one() {
        let local = "https://docs.example.org/index.md".to_string();
        let remote = URL.to_string();
        let env = MockEnv::new("/")
            .with_failure(&local, FetchError::Status(404))
            .with_response(&remote, "Cached");
        let fetcher = Fetcher::default();
        block_on(fetcher.fetch(&env, &remote)).unwrap();

        let document = fetcher
            .fetch_first_blocking(&env, &[local, remote])
            .unwrap();
        assert_eq!(document.as_str(), "Cached");
        assert_eq!(env.network_calls(), 1);
    }

    #[test]
    fn fetch_first_falls_through_to_next_candidate() {
        let local = "https://docs.example.org/index.md".to_string();
        let env = MockEnv::new("/")
            .with_failure(&local, FetchError::Network("offline".to_string()))
            .with_response(URL, "Remote");
        let fetcher = Fetcher::default();

        let document = block_on(fetcher.fetch_first(&env, &[local, URL.to_string()])).unwrap();
        assert_eq!(document.as_str(), "Remote");
        assert!(fetcher.cache().contains(URL));
    }
}
