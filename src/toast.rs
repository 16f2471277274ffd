//! Transient on-page feedback. One toast at a time; a new one replaces the
//! current toast and restarts the timers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ToastTiming {
    pub visible_ms: u32,
    pub fade_ms: u32,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            visible_ms: 2000,
            fade_ms: 300,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

/// Where toasts are drawn.
pub trait ToastSurface {
    fn show(&self, message: &str, tone: Tone);
    fn fade(&self);
    fn remove(&self);
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Visible,
    Fading,
}

#[derive(Default)]
struct ToastState {
    ticket: u64,
    phase: Option<Phase>,
    message: String,
}

pub struct Toaster<S: ToastSurface, T: Scheduler> {
    surface: S,
    scheduler: T,
    timing: ToastTiming,
    state: RefCell<ToastState>,
}

impl<S: ToastSurface + 'static, T: Scheduler + 'static> Toaster<S, T> {
    pub fn new(surface: S, scheduler: T, timing: ToastTiming) -> Rc<Self> {
        Rc::new(Self {
            surface,
            scheduler,
            timing,
            state: RefCell::new(ToastState::default()),
        })
    }

    pub fn notify(self: &Rc<Self>, message: &str, tone: Tone) {
        let ticket = {
            let mut state = self.state.borrow_mut();
            if state.phase.is_some() {
                self.surface.remove();
            }
            state.ticket += 1;
            state.phase = Some(Phase::Visible);
            state.message = message.to_string();
            state.ticket
        };
        self.surface.show(message, tone);

        let weak = Rc::downgrade(self);
        self.scheduler.schedule(
            Duration::from_millis(self.timing.visible_ms.into()),
            Box::new(move || Self::with(&weak, |toaster| toaster.begin_fade(ticket))),
        );
    }

    /// Message of the toast currently on screen, fading or not.
    pub fn current(&self) -> Option<String> {
        let state = self.state.borrow();
        state.phase.map(|_| state.message.clone())
    }

    pub fn is_fading(&self) -> bool {
        self.state.borrow().phase == Some(Phase::Fading)
    }

    fn with(weak: &Weak<Self>, f: impl FnOnce(&Rc<Self>)) {
        if let Some(toaster) = weak.upgrade() {
            f(&toaster);
        }
    }

    fn begin_fade(self: &Rc<Self>, ticket: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.ticket != ticket || state.phase != Some(Phase::Visible) {
                return;
            }
            state.phase = Some(Phase::Fading);
        }
        self.surface.fade();

        let weak = Rc::downgrade(self);
        self.scheduler.schedule(
            Duration::from_millis(self.timing.fade_ms.into()),
            Box::new(move || Self::with(&weak, |toaster| toaster.expire(ticket))),
        );
    }

    fn expire(&self, ticket: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.ticket != ticket || state.phase.is_none() {
                return;
            }
            state.phase = None;
        }
        self.surface.remove();
    }
}
