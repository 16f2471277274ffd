//! Site configuration for the copy-page pipeline.
//!
//! Layers, lowest first: compiled defaults, a global config object, a JSON
//! config block, then the two page metadata elements. Each layer only
//! overrides the keys it names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::fallback::PruneRules;
use crate::location::ResolveMode;
use crate::toast::ToastTiming;

pub const REPO_META_NAME: &str = "markdown-source-repo";
pub const BASE_PATH_META_NAME: &str = "markdown-base-path";
pub const CONFIG_SCRIPT_ID: &str = "copy-page-config";
pub const CONFIG_GLOBAL: &str = "__COPY_PAGE_CONFIG__";

pub const DEFAULT_REPO_BASE_URL: &str =
    "https://raw.githubusercontent.com/jeffersonaaron25/PyEzTrace/main";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub base_path: Option<String>,
    pub repo_base_url: String,
    pub docs_dir: String,
    pub content_selector: String,
    pub source_link_selector: String,
    pub action_attribute: String,
    pub copy_mode: ResolveMode,
    pub fetch_timeout_ms: u32,
    pub toast: ToastTiming,
    pub log_level: String,
    pub prune: PruneRules,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            repo_base_url: DEFAULT_REPO_BASE_URL.to_string(),
            docs_dir: "docs".to_string(),
            content_selector: ".md-content".to_string(),
            source_link_selector: "a[title=\"View source of this page\"]".to_string(),
            action_attribute: "data-copy-action".to_string(),
            copy_mode: ResolveMode::LocalFirst,
            fetch_timeout_ms: 8000,
            toast: ToastTiming::default(),
            log_level: "info".to_string(),
            prune: PruneRules::default(),
        }
    }
}

impl SiteConfig {
    /// Overlays the keys present in `layer` onto this config.
    pub fn merge_value(&mut self, layer: Value) -> Result<(), ConfigError> {
        let Value::Object(overrides) = layer else {
            return Err(ConfigError::Js("config layer must be an object".to_string()));
        };
        let mut current = serde_json::to_value(&*self)?;
        if let Value::Object(base) = &mut current {
            for (key, value) in overrides {
                match (base.get_mut(&key), value) {
                    (Some(Value::Object(nested)), Value::Object(inner)) => {
                        nested.extend(inner);
                    }
                    (_, value) => {
                        base.insert(key, value);
                    }
                }
            }
        }
        *self = serde_json::from_value(current)?;
        Ok(())
    }

    pub fn merge_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let layer: Value = serde_json::from_str(json)?;
        self.merge_value(layer)
    }

    /// Applies the page metadata elements. Blank values are ignored.
    pub fn apply_meta(&mut self, repo_base_url: Option<String>, base_path: Option<String>) {
        if let Some(repo) = repo_base_url.filter(|r| !r.trim().is_empty()) {
            self.repo_base_url = repo.trim().trim_end_matches('/').to_string();
        }
        if let Some(base) = base_path.filter(|b| !b.trim().is_empty()) {
            self.base_path = Some(base.trim().to_string());
        }
    }

    /// The base-path prefix with a leading slash and no trailing slash.
    /// `None` when unset or when it names the site root.
    pub fn normalized_base_path(&self) -> Option<String> {
        let raw = self.base_path.as_deref()?.trim().trim_matches('/');
        if raw.is_empty() {
            None
        } else {
            Some(format!("/{raw}"))
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
