use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::front_matter::strip_front_matter;

/// Fetched Markdown with front matter removed and surrounding whitespace trimmed.
#[derive(Clone, PartialEq, Eq)]
pub struct MarkdownDocument(Rc<str>);

impl MarkdownDocument {
    pub fn from_source(raw: &str) -> Self {
        Self(Rc::from(strip_front_matter(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for MarkdownDocument {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkdownDocument({} bytes)", self.0.len())
    }
}

/// Page-session cache of resolved source URL to document.
///
/// Clones share the same map. Entries live until the page is reloaded; a
/// repeated insert for a URL replaces the earlier entry.
#[derive(Clone, Default)]
pub struct MarkdownCache {
    entries: Rc<RefCell<HashMap<String, MarkdownDocument>>>,
}

impl MarkdownCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<MarkdownDocument> {
        self.entries.borrow().get(url).cloned()
    }

    pub fn insert(&self, url: impl Into<String>, document: MarkdownDocument) {
        self.entries.borrow_mut().insert(url.into(), document);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.borrow().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
