//! Wires the dispatcher to the live document.

mod dom;
mod env;
mod logging;
mod toast;

use std::rc::Rc;

use js_sys::{Function, Reflect};
use leptos::prelude::{document, window};
use log::{debug, info, warn, LevelFilter};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event};

pub use env::BrowserEnv;
pub use toast::{DomToastSurface, TimeoutScheduler};

use crate::config::{SiteConfig, BASE_PATH_META_NAME, CONFIG_GLOBAL, CONFIG_SCRIPT_ID, REPO_META_NAME};
use crate::dispatch::{Dispatch, Dispatcher};
use crate::fetch::Fetcher;
use crate::toast::Toaster;

type PageDispatcher = Dispatcher<BrowserEnv>;

/// Builds the configuration and hooks up click handling and prefetching.
pub fn install() -> Result<(), JsValue> {
    logging::init(LevelFilter::Info);
    let config = load_config();
    logging::init(config.log_level());

    let toaster = Toaster::new(DomToastSurface::default(), TimeoutScheduler, config.toast);
    let env = BrowserEnv::new(config.clone(), toaster);
    let dispatcher = Rc::new(Dispatcher::new(env, config, Fetcher::default()));

    listen_for_actions(&dispatcher)?;
    watch_navigation(&dispatcher)?;
    info!("installed");
    Ok(())
}

fn load_config() -> SiteConfig {
    let mut config = SiteConfig::default();

    if let Ok(global) = Reflect::get(&window(), &JsValue::from_str(CONFIG_GLOBAL)) {
        if global.is_object() {
            let merged = serde_wasm_bindgen::from_value::<serde_json::Value>(global)
                .map_err(|err| err.to_string())
                .and_then(|value| config.merge_value(value).map_err(|err| err.to_string()));
            if let Err(err) = merged {
                warn!("ignoring {CONFIG_GLOBAL}: {err}");
            }
        }
    }

    if let Some(json) = document()
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
    {
        if let Err(err) = config.merge_json(&json) {
            warn!("ignoring #{CONFIG_SCRIPT_ID}: {err}");
        }
    }

    config.apply_meta(
        dom::meta_content(REPO_META_NAME),
        dom::meta_content(BASE_PATH_META_NAME),
    );
    config
}

fn listen_for_actions(dispatcher: &Rc<PageDispatcher>) -> Result<(), JsValue> {
    let attribute = dispatcher.config().action_attribute.clone();
    let selector = format!("[{attribute}]");
    let dispatcher = Rc::clone(dispatcher);

    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Ok(Some(item)) = target.closest(&selector) else {
            return;
        };
        let Some(id) = item.get_attribute(&attribute) else {
            return;
        };
        match dispatcher.dispatch_id(&id) {
            Dispatch::Ignored => {}
            outcome => {
                event.prevent_default();
                event.stop_immediate_propagation();
                if let Dispatch::Deferred(deferred) = outcome {
                    let dispatcher = Rc::clone(&dispatcher);
                    spawn_local(async move {
                        dispatcher.finish(deferred).await;
                    });
                }
            }
        }
    });

    // Capture phase, so menu items are handled before their own listeners.
    document().add_event_listener_with_callback_and_bool(
        "click",
        on_click.as_ref().unchecked_ref(),
        true,
    )?;
    on_click.forget();
    Ok(())
}

fn prefetch(dispatcher: &Rc<PageDispatcher>) {
    let Some(task) = dispatcher.prefetch_task() else {
        return;
    };
    debug!("prefetching {:?}", task.urls());
    let dispatcher = Rc::clone(dispatcher);
    spawn_local(async move {
        task.run(dispatcher.env()).await;
    });
}

/// Prefetches on every page view. Instant-navigation themes expose a
/// `document$` observable that emits per view; otherwise use the initial
/// load plus history navigation.
fn watch_navigation(dispatcher: &Rc<PageDispatcher>) -> Result<(), JsValue> {
    let on_view = {
        let dispatcher = Rc::clone(dispatcher);
        Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| prefetch(&dispatcher))
    };

    let observable = Reflect::get(&window(), &JsValue::from_str("document$"))
        .ok()
        .filter(|value| value.is_object());
    if let Some(observable) = observable {
        let subscribe = Reflect::get(&observable, &JsValue::from_str("subscribe"))?;
        if let Some(subscribe) = subscribe.dyn_ref::<Function>() {
            subscribe.call1(&observable, on_view.as_ref())?;
            on_view.forget();
            return Ok(());
        }
    }

    let loading = Reflect::get(&document(), &JsValue::from_str("readyState"))?
        .as_string()
        .is_some_and(|state| state == "loading");
    if loading {
        document().add_event_listener_with_callback(
            "DOMContentLoaded",
            on_view.as_ref().unchecked_ref(),
        )?;
    } else {
        prefetch(dispatcher);
    }
    // `pushState` fires no event; such navigations get no prefetch and the
    // copy falls back to the blocking fetch.
    window().add_event_listener_with_callback("popstate", on_view.as_ref().unchecked_ref())?;
    on_view.forget();
    Ok(())
}
