use log::debug;

use crate::cache::MarkdownDocument;
use crate::config::SiteConfig;
use crate::env::{Network, Page};
use crate::fetch::Fetcher;
use crate::location::Resolver;

/// Background cache warm-up for one page.
///
/// The candidate URLs are fixed when the task is created, so a task that is
/// still running after the visitor navigates away only ever writes the entry
/// for the page that started it. Tasks are detached and never cancelled.
pub struct PrefetchTask {
    urls: Vec<String>,
    fetcher: Fetcher,
}

impl PrefetchTask {
    /// `None` when the page resolves to nothing or is already cached.
    pub fn for_current_page<P: Page + ?Sized>(
        page: &P,
        config: &SiteConfig,
        fetcher: &Fetcher,
    ) -> Option<Self> {
        let urls = Resolver::new(config).candidates(page, config.copy_mode);
        if urls.is_empty() {
            debug!("nothing to prefetch for {}", page.pathname());
            return None;
        }
        if fetcher.cached_any(&urls).is_some() {
            debug!("{} already cached", page.pathname());
            return None;
        }
        Some(Self {
            urls,
            fetcher: fetcher.clone(),
        })
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub async fn run<N: Network + ?Sized>(self, network: &N) -> Option<MarkdownDocument> {
        match self.fetcher.fetch_first(network, &self.urls).await {
            Ok(document) => {
                debug!("prefetched {} bytes", document.len());
                Some(document)
            }
            Err(err) => {
                debug!("prefetch gave up: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::ResolveMode;
    use crate::testing::MockEnv;
    use futures::executor::block_on;

    fn remote_only() -> SiteConfig {
        SiteConfig {
            repo_base_url: "https://raw.githubusercontent.com/acme/widgets/main".to_string(),
            copy_mode: ResolveMode::RemoteFirst,
            ..SiteConfig::default()
        }
    }

    #[test]
    fn superseded_task_writes_its_own_page_only() {
        let old_url = "https://raw.githubusercontent.com/acme/widgets/main/docs/old.md";
        let new_url = "https://raw.githubusercontent.com/acme/widgets/main/docs/new.md";
        let env = MockEnv::new("/old")
            .with_response(old_url, "Old page")
            .with_response(new_url, "New page");
        let config = remote_only();
        let fetcher = Fetcher::default();

        let stale = PrefetchTask::for_current_page(&env, &config, &fetcher).unwrap();
        env.navigate("/new");
        let fresh = PrefetchTask::for_current_page(&env, &config, &fetcher).unwrap();
        assert_eq!(fresh.urls(), [new_url.to_string()]);

        block_on(fresh.run(&env)).unwrap();
        block_on(stale.run(&env)).unwrap();

        assert_eq!(fetcher.cache().get(new_url).unwrap().as_str(), "New page");
        assert_eq!(fetcher.cache().get(old_url).unwrap().as_str(), "Old page");
    }

    #[test]
    fn failed_prefetch_leaves_cache_empty() {
        let env = MockEnv::new("/missing/");
        let config = remote_only();
        let fetcher = Fetcher::default();

        let task = PrefetchTask::for_current_page(&env, &config, &fetcher).unwrap();
        assert!(block_on(task.run(&env)).is_none());
        assert!(fetcher.cache().is_empty());
        assert!(PrefetchTask::for_current_page(&env, &config, &fetcher).is_some());
    }

    #[test]
    fn nothing_to_do_without_candidates() {
        let env = MockEnv::new("/");
        let mut config = remote_only();
        config.repo_base_url.clear();
        assert!(PrefetchTask::for_current_page(&env, &config, &Fetcher::default()).is_none());
    }
}
