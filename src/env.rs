//! Capabilities the pipeline needs from its host page.
//!
//! The browser implementation lives in [`crate::browser`]; tests supply
//! in-memory ones. Everything is single-threaded, so nothing here is `Send`.

use crate::dispatch::Notice;
use crate::error::{ClipboardError, FetchError};
use crate::fallback::DomNode;

pub trait Page {
    /// Path component of the current address, e.g. `/docs/usage/`.
    fn pathname(&self) -> String;
    /// Scheme, host and port of the current address, without a trailing slash.
    fn origin(&self) -> String;
    /// `href` of the "view source of this page" link inside the content region.
    fn source_link_href(&self) -> Option<String>;
    /// Owned copy of the rendered content region.
    fn content_snapshot(&self) -> Option<DomNode>;
}

#[allow(async_fn_in_trait)]
pub trait Network {
    /// Issues a GET that does not return until the response has arrived.
    ///
    /// This stalls the event loop on purpose: some clipboard permission models
    /// only accept writes made before the originating click handler returns.
    fn get_blocking(&self, url: &str) -> Result<String, FetchError>;

    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

#[allow(async_fn_in_trait)]
pub trait ClipboardBackend {
    /// Legacy copy through a temporary, invisible text field. Must run inside
    /// the user gesture's call stack.
    fn copy_in_gesture(&self, text: &str) -> Result<(), ClipboardError>;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

pub trait Shell {
    /// Opens `url` in a new browsing context. `false` when the host refused.
    fn open_tab(&self, url: &str) -> bool;
    /// Offers `text` to the user as a downloaded file.
    fn save_file(&self, file_name: &str, text: &str) -> bool;
    fn notify(&self, notice: Notice);
}

pub trait Environment: Page + Network + ClipboardBackend + Shell {}

impl<T> Environment for T where T: Page + Network + ClipboardBackend + Shell + ?Sized {}
