//! Degraded copy: Markdown-like text scraped from the rendered page.
//!
//! Used when no source URL resolves or every fetch fails. Works on an owned
//! snapshot of the content region, so the live page is never touched.

mod convert;
mod node;
mod prune;

pub use convert::to_markdown;
pub use node::{DomNode, Element};
pub use prune::PruneRules;

/// Prunes `snapshot` and converts what is left.
pub fn render_fallback(mut snapshot: DomNode, rules: &PruneRules) -> String {
    rules.apply(&mut snapshot);
    to_markdown(&snapshot)
}
