//! "Copy page as Markdown" actions for static documentation sites.
//!
//! Everything except [`browser`] works against the traits in [`env`], so the
//! resolution, fetching, conversion and dispatch logic runs natively in tests.

pub mod browser;
pub mod cache;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod front_matter;
pub mod location;
pub mod prefetch;
pub mod raw_url;
pub mod toast;

#[cfg(test)]
mod testing;

pub use cache::{MarkdownCache, MarkdownDocument};
pub use command::{Assistant, Command};
pub use config::SiteConfig;
pub use dispatch::{Dispatch, Dispatcher, Notice};
pub use error::{ClipboardError, ConfigError, FetchError};
pub use location::{ResolveMode, Resolver};
