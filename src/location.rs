use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::env::Page;
use crate::raw_url::normalize_raw_url;

pub const ROOT_DOCUMENT: &str = "index.md";

/// Which derived location a caller would rather fetch from when the page has
/// no source link of its own.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveMode {
    #[default]
    LocalFirst,
    RemoteFirst,
}

fn normalize_rel_path(path: &str) -> String {
    path.trim().replace('\\', "/").trim_start_matches('/').to_string()
}

fn strip_base_path<'a>(pathname: &'a str, base_path: Option<&str>) -> &'a str {
    let Some(base) = base_path else {
        return pathname;
    };
    if pathname == base {
        return "";
    }
    match pathname.strip_prefix(base) {
        Some(rest) if rest.starts_with('/') => rest,
        _ => pathname,
    }
}

fn ensure_markdown_extension(path: &str) -> String {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".md") {
        path.to_string()
    } else if lower.ends_with(".html") {
        format!("{}.md", &path[..path.len() - ".html".len()])
    } else {
        format!("{path}.md")
    }
}

/// Maps a browser pathname to the Markdown document path relative to the
/// documentation root. `base_path` must already be normalized
/// (see [`SiteConfig::normalized_base_path`]).
pub fn source_path(pathname: &str, base_path: Option<&str>) -> String {
    let stripped = normalize_rel_path(strip_base_path(pathname, base_path));
    if stripped.is_empty() {
        return ROOT_DOCUMENT.to_string();
    }
    if stripped.ends_with('/') {
        return format!("{stripped}{ROOT_DOCUMENT}");
    }
    ensure_markdown_extension(&stripped)
}

pub fn local_url(origin: &str, base_path: Option<&str>, path: &str) -> String {
    format!(
        "{}{}/{}",
        origin.trim_end_matches('/'),
        base_path.unwrap_or_default(),
        path
    )
}

pub fn remote_url(repo_base_url: &str, docs_dir: &str, path: &str) -> String {
    let docs_dir = docs_dir.trim_matches('/');
    let repo = repo_base_url.trim_end_matches('/');
    if docs_dir.is_empty() {
        format!("{repo}/{path}")
    } else {
        format!("{repo}/{docs_dir}/{path}")
    }
}

/// Turns the current page into the URLs its raw Markdown may live at.
pub struct Resolver<'a> {
    config: &'a SiteConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Candidate source URLs in the order they should be tried.
    ///
    /// A source link inside the content region is authoritative and is the
    /// only candidate when present. Otherwise the path-derived locations are
    /// returned in `mode` order; remote-first callers get the remote one only.
    pub fn candidates<P: Page + ?Sized>(&self, page: &P, mode: ResolveMode) -> Vec<String> {
        if let Some(href) = page.source_link_href().filter(|h| !h.trim().is_empty()) {
            let url = normalize_raw_url(href.trim());
            debug!("resolved source link {url}");
            return vec![url];
        }

        let base_path = self.config.normalized_base_path();
        let path = source_path(&page.pathname(), base_path.as_deref());
        let remote = remote_url(&self.config.repo_base_url, &self.config.docs_dir, &path);
        match mode {
            ResolveMode::LocalFirst => {
                let origin = page.origin();
                let mut urls = Vec::with_capacity(2);
                if !origin.is_empty() {
                    urls.push(local_url(&origin, base_path.as_deref(), &path));
                }
                if !self.config.repo_base_url.is_empty() {
                    urls.push(remote);
                }
                urls
            }
            ResolveMode::RemoteFirst if self.config.repo_base_url.is_empty() => Vec::new(),
            ResolveMode::RemoteFirst => vec![remote],
        }
    }

    pub fn resolve<P: Page + ?Sized>(&self, page: &P, mode: ResolveMode) -> Option<String> {
        self.candidates(page, mode).into_iter().next()
    }
}
