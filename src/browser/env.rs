use std::rc::Rc;
use std::time::Duration;

use js_sys::{Array, Reflect};
use leptos::prelude::{document, set_timeout_with_handle, window};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, Blob, BlobPropertyBag, Element, HtmlAnchorElement, HtmlDocument,
    HtmlTextAreaElement, RequestCache, RequestInit, Response, Url, XmlHttpRequest,
};

use super::dom;
use super::toast::{DomToastSurface, TimeoutScheduler};
use crate::config::SiteConfig;
use crate::dispatch::Notice;
use crate::env::{ClipboardBackend, Network, Page, Shell};
use crate::error::{ClipboardError, FetchError};
use crate::fallback::DomNode;
use crate::toast::Toaster;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = writeText, catch)]
    async fn clipboard_write_text(text: &str) -> Result<JsValue, JsValue>;
}

pub type BrowserToaster = Toaster<DomToastSurface, TimeoutScheduler>;

/// The live page, network, clipboard and toast surface.
pub struct BrowserEnv {
    config: SiteConfig,
    toaster: Rc<BrowserToaster>,
}

impl BrowserEnv {
    pub fn new(config: SiteConfig, toaster: Rc<BrowserToaster>) -> Self {
        Self { config, toaster }
    }

    fn content_root(&self) -> Option<Element> {
        dom::query(&self.config.content_selector)
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

impl Page for BrowserEnv {
    fn pathname(&self) -> String {
        window().location().pathname().unwrap_or_default()
    }

    fn origin(&self) -> String {
        window().location().origin().unwrap_or_default()
    }

    fn source_link_href(&self) -> Option<String> {
        let link = self
            .content_root()?
            .query_selector(&self.config.source_link_selector)
            .ok()
            .flatten()?;
        // `href` on the anchor is already absolute
        match link.dyn_ref::<HtmlAnchorElement>() {
            Some(anchor) => Some(anchor.href()),
            None => link.get_attribute("href"),
        }
    }

    fn content_snapshot(&self) -> Option<DomNode> {
        dom::snapshot(self.content_root()?.as_ref())
    }
}

impl Network for BrowserEnv {
    fn get_blocking(&self, url: &str) -> Result<String, FetchError> {
        // Synchronous on purpose: the clipboard write that follows must still
        // run inside the click. Browsers reject timeouts on synchronous
        // requests made from a document, so this can stall until the network
        // gives up. No extra headers, to keep cross-origin requests simple.
        let request = XmlHttpRequest::new().map_err(|e| FetchError::Network(describe(&e)))?;
        request
            .open_with_async("GET", url, false)
            .map_err(|e| FetchError::Network(describe(&e)))?;
        request
            .send()
            .map_err(|e| FetchError::Network(describe(&e)))?;
        let status = request
            .status()
            .map_err(|e| FetchError::Network(describe(&e)))?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Status(status));
        }
        request
            .response_text()
            .map_err(|e| FetchError::Body(describe(&e)))?
            .ok_or_else(|| FetchError::Body("missing response text".to_string()))
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let controller = AbortController::new().map_err(|e| FetchError::Network(describe(&e)))?;
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_cache(RequestCache::NoCache);
        init.set_signal(Some(&controller.signal()));

        let timer = {
            let controller = controller.clone();
            set_timeout_with_handle(
                move || controller.abort(),
                Duration::from_millis(u64::from(self.config.fetch_timeout_ms)),
            )
            .ok()
        };

        let result = async {
            let response: Response = JsFuture::from(window().fetch_with_str_and_init(url, &init))
                .await
                .map_err(|e| FetchError::Network(describe(&e)))?
                .dyn_into()
                .map_err(|_| FetchError::Body("not a response".to_string()))?;
            if !response.ok() {
                return Err(FetchError::Status(response.status()));
            }
            let text = response.text().map_err(|e| FetchError::Body(describe(&e)))?;
            JsFuture::from(text)
                .await
                .map_err(|e| FetchError::Body(describe(&e)))?
                .as_string()
                .ok_or_else(|| FetchError::Body("response body is not text".to_string()))
        }
        .await;

        if let Some(timer) = timer {
            timer.clear();
        }
        if result.is_err() && controller.signal().aborted() {
            return Err(FetchError::Timeout);
        }
        result
    }
}

/// Detaches the element when dropped.
struct Detach<'a>(&'a Element);

impl Drop for Detach<'_> {
    fn drop(&mut self) {
        self.0.remove();
    }
}

impl ClipboardBackend for BrowserEnv {
    fn copy_in_gesture(&self, text: &str) -> Result<(), ClipboardError> {
        let document = document();
        let body = document
            .body()
            .ok_or_else(|| ClipboardError::Dom("document has no body".to_string()))?;
        let field: HtmlTextAreaElement = document
            .create_element("textarea")
            .map_err(|e| ClipboardError::Dom(describe(&e)))?
            .dyn_into()
            .map_err(|_| ClipboardError::Dom("not a textarea".to_string()))?;
        field.set_value(text);
        let _ = field.set_attribute("readonly", "");
        let _ = field.set_attribute("aria-hidden", "true");
        let style = field.style();
        for (property, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("opacity", "0"),
            ("pointer-events", "none"),
        ] {
            let _ = style.set_property(property, value);
        }

        body.append_child(&field)
            .map_err(|e| ClipboardError::Dom(describe(&e)))?;
        let _attached = Detach(&field);

        let _ = field.focus();
        field.select();
        let _ = field.set_selection_range(0, text.encode_utf16().count() as u32);

        let html: HtmlDocument = document
            .dyn_into()
            .map_err(|_| ClipboardError::Dom("not an HTML document".to_string()))?;
        match html.exec_command("copy") {
            Ok(true) => Ok(()),
            Ok(false) => Err(ClipboardError::CommandRejected),
            Err(e) => Err(ClipboardError::Rejected(describe(&e))),
        }
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let available = Reflect::has(&window().navigator(), &JsValue::from_str("clipboard"))
            .unwrap_or(false);
        if !available {
            return Err(ClipboardError::Unavailable);
        }
        clipboard_write_text(text)
            .await
            .map(|_| ())
            .map_err(|e| ClipboardError::Rejected(describe(&e)))
    }
}

impl Shell for BrowserEnv {
    fn open_tab(&self, url: &str) -> bool {
        match window().open_with_url_and_target(url, "_blank") {
            Ok(Some(opened)) => {
                let _ = opened.set_opener(&JsValue::NULL);
                true
            }
            Ok(None) => {
                debug!("popup blocked for {url}");
                false
            }
            Err(err) => {
                warn!("window.open failed: {}", describe(&err));
                false
            }
        }
    }

    fn save_file(&self, file_name: &str, text: &str) -> bool {
        let saved = (|| -> Result<(), JsValue> {
            let options = BlobPropertyBag::new();
            options.set_type("text/markdown;charset=utf-8");
            let parts = Array::of1(&JsValue::from_str(text));
            let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
            let href = Url::create_object_url_with_blob(&blob)?;

            let document = document();
            let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
            anchor.set_href(&href);
            anchor.set_download(file_name);
            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("document has no body"))?;
            body.append_child(&anchor)?;
            anchor.click();
            anchor.remove();
            Url::revoke_object_url(&href)
        })();
        if let Err(err) = &saved {
            warn!("download of {file_name} failed: {}", describe(err));
        }
        saved.is_ok()
    }

    fn notify(&self, notice: Notice) {
        self.toaster.notify(notice.message(), notice.tone());
    }
}
