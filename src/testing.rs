//! In-memory environment and fixture helpers for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use scraper::{ElementRef, Html};

use crate::dispatch::Notice;
use crate::env::{ClipboardBackend, Network, Page, Shell};
use crate::error::{ClipboardError, FetchError};
use crate::fallback::{DomNode, Element};

pub const ORIGIN: &str = "https://docs.example.org";

pub struct MockEnv {
    pathname: RefCell<String>,
    source_link: Option<String>,
    snapshot: Option<DomNode>,
    responses: HashMap<String, Result<String, FetchError>>,
    requested: RefCell<Vec<String>>,
    legacy_copy: Result<(), ClipboardError>,
    async_clipboard: Result<(), ClipboardError>,
    legacy_calls: Cell<usize>,
    async_calls: Cell<usize>,
    clipboard: RefCell<Option<String>>,
    open_allowed: bool,
    opened: RefCell<Vec<String>>,
    saved: RefCell<Vec<(String, String)>>,
    notices: RefCell<Vec<Notice>>,
}

impl MockEnv {
    pub fn new(pathname: &str) -> Self {
        Self {
            pathname: RefCell::new(pathname.to_string()),
            source_link: None,
            snapshot: None,
            responses: HashMap::new(),
            requested: RefCell::new(Vec::new()),
            legacy_copy: Ok(()),
            async_clipboard: Ok(()),
            legacy_calls: Cell::new(0),
            async_calls: Cell::new(0),
            clipboard: RefCell::new(None),
            open_allowed: true,
            opened: RefCell::new(Vec::new()),
            saved: RefCell::new(Vec::new()),
            notices: RefCell::new(Vec::new()),
        }
    }

    pub fn with_source_link(mut self, href: &str) -> Self {
        self.source_link = Some(href.to_string());
        self
    }

    pub fn with_snapshot(mut self, snapshot: DomNode) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn with_failure(mut self, url: &str, err: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(err));
        self
    }

    pub fn with_legacy_copy(mut self, result: Result<(), ClipboardError>) -> Self {
        self.legacy_copy = result;
        self
    }

    pub fn with_async_clipboard(mut self, result: Result<(), ClipboardError>) -> Self {
        self.async_clipboard = result;
        self
    }

    pub fn blocking_popups(mut self) -> Self {
        self.open_allowed = false;
        self
    }

    pub fn navigate(&self, pathname: &str) {
        *self.pathname.borrow_mut() = pathname.to_string();
    }

    pub fn network_calls(&self) -> usize {
        self.requested.borrow().len()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.borrow().clone()
    }

    pub fn clipboard_attempts(&self) -> usize {
        self.legacy_calls.get() + self.async_calls.get()
    }

    pub fn async_clipboard_calls(&self) -> usize {
        self.async_calls.get()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    pub fn saved(&self) -> Vec<(String, String)> {
        self.saved.borrow().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    fn respond(&self, url: &str) -> Result<String, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

impl Page for MockEnv {
    fn pathname(&self) -> String {
        self.pathname.borrow().clone()
    }

    fn origin(&self) -> String {
        ORIGIN.to_string()
    }

    fn source_link_href(&self) -> Option<String> {
        self.source_link.clone()
    }

    fn content_snapshot(&self) -> Option<DomNode> {
        self.snapshot.clone()
    }
}

impl Network for MockEnv {
    fn get_blocking(&self, url: &str) -> Result<String, FetchError> {
        self.respond(url)
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.respond(url)
    }
}

impl ClipboardBackend for MockEnv {
    fn copy_in_gesture(&self, text: &str) -> Result<(), ClipboardError> {
        self.legacy_calls.set(self.legacy_calls.get() + 1);
        self.legacy_copy.clone()?;
        *self.clipboard.borrow_mut() = Some(text.to_string());
        Ok(())
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.async_calls.set(self.async_calls.get() + 1);
        self.async_clipboard.clone()?;
        *self.clipboard.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

impl Shell for MockEnv {
    fn open_tab(&self, url: &str) -> bool {
        if self.open_allowed {
            self.opened.borrow_mut().push(url.to_string());
        }
        self.open_allowed
    }

    fn save_file(&self, file_name: &str, text: &str) -> bool {
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), text.to_string()));
        true
    }

    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

/// Parses an HTML fragment into the snapshot model, the way the browser
/// binding copies the live content region.
pub fn parse_fragment(html: &str) -> DomNode {
    let fragment = Html::parse_fragment(html);
    convert_element(fragment.root_element())
}

fn convert_element(element: ElementRef<'_>) -> DomNode {
    let value = element.value();
    let mut out = Element::new(value.name());
    for (name, attr) in value.attrs() {
        out = out.with_attr(name, attr);
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            out.children.push(convert_element(child_element));
        } else if let Some(text) = child.value().as_text() {
            out.children.push(DomNode::text(&**text));
        }
    }
    out.into()
}
