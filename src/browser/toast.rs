use std::cell::RefCell;
use std::time::Duration;

use leptos::prelude::{document, set_timeout_with_handle};
use log::warn;
use web_sys::Element;

use crate::toast::{Scheduler, ToastSurface, Tone};

const TOAST_CLASS: &str = "copy-page-toast";
const FADING_CLASS: &str = "copy-page-toast--fading";

/// Draws toasts as a `div` appended to the document body.
#[derive(Default)]
pub struct DomToastSurface {
    current: RefCell<Option<Element>>,
}

impl ToastSurface for DomToastSurface {
    fn show(&self, message: &str, tone: Tone) {
        let document = document();
        let Some(body) = document.body() else {
            return;
        };
        let Ok(toast) = document.create_element("div") else {
            return;
        };
        let modifier = match tone {
            Tone::Success => "copy-page-toast--success",
            Tone::Failure => "copy-page-toast--failure",
        };
        toast.set_class_name(&format!("{TOAST_CLASS} {modifier}"));
        let _ = toast.set_attribute("role", "status");
        let _ = toast.set_attribute("aria-live", "polite");
        toast.set_text_content(Some(message));
        if body.append_child(&toast).is_ok() {
            *self.current.borrow_mut() = Some(toast);
        }
    }

    fn fade(&self) {
        if let Some(toast) = self.current.borrow().as_ref() {
            let _ = toast.class_list().add_1(FADING_CLASS);
        }
    }

    fn remove(&self) {
        if let Some(toast) = self.current.borrow_mut().take() {
            toast.remove();
        }
    }
}

pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        if let Err(err) = set_timeout_with_handle(task, delay) {
            warn!("could not schedule toast timer: {err:?}");
        }
    }
}
