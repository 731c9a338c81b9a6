// Single shared scroll listener. Every scroll-driven behavior subscribes here instead of
// registering its own handler, so all of them run under the same rate limit.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use web_sys::Window;

use crate::types::ScrollScheduling;

/// Coalesces a burst of scroll events into one pending dispatch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    pub fn new() -> Self {
        FrameGate { pending: false }
    }

    /// Returns `true` if the caller must schedule a dispatch; `false` if one is already queued.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// The queued dispatch is running; later events need a new one.
    pub fn release(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

type Subscriber = Box<dyn Fn(f64)>;

struct DispatchState {
    window: Window,
    scheduling: ScrollScheduling,
    subscribers: RefCell<Vec<Subscriber>>,
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    timeout: RefCell<Option<Timeout>>,
}

impl DispatchState {
    fn dispatch(&self) {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(scroll_y);
        }
    }
}

/// Shared, rate-limited window scroll dispatcher.
pub struct ScrollDispatcher {
    state: Rc<DispatchState>,
    listener: Option<EventListener>,
}

impl ScrollDispatcher {
    pub fn new(window: Window, scheduling: ScrollScheduling) -> Self {
        ScrollDispatcher {
            state: Rc::new(DispatchState {
                window,
                scheduling,
                subscribers: RefCell::new(Vec::new()),
                gate: RefCell::new(FrameGate::new()),
                frame: RefCell::new(None),
                timeout: RefCell::new(None),
            }),
            listener: None,
        }
    }

    /// Register a handler called with the current `scrollY` on every dispatch.
    pub fn subscribe(&self, handler: impl Fn(f64) + 'static) {
        self.state.subscribers.borrow_mut().push(Box::new(handler));
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.subscribers.borrow().len()
    }

    /// Attach the passive scroll listener. Calling twice is a no-op.
    pub fn start(&mut self) {
        if self.listener.is_some() {
            return;
        }
        let state = Rc::downgrade(&self.state);
        let listener = EventListener::new(&self.state.window, "scroll", move |_| {
            if let Some(state) = state.upgrade() {
                schedule(&state);
            }
        });
        tracing::debug!(
            subscribers = self.subscriber_count(),
            scheduling = ?self.state.scheduling,
            "scroll dispatcher started"
        );
        self.listener = Some(listener);
    }

    /// Run every subscriber against the current position right away.
    pub fn sync(&self) {
        self.state.dispatch();
    }

    /// Detach the listener and cancel any queued dispatch. Subscribers are kept.
    pub fn stop(&mut self) {
        self.listener = None;
        self.state.frame.borrow_mut().take();
        self.state.timeout.borrow_mut().take();
        self.state.gate.borrow_mut().release();
    }
}

impl Drop for ScrollDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(state: &Rc<DispatchState>) {
    match state.scheduling {
        ScrollScheduling::AnimationFrame => {
            if !state.gate.borrow_mut().request() {
                return;
            }
            let weak = Rc::downgrade(state);
            let handle = request_animation_frame(move |_| {
                if let Some(state) = weak.upgrade() {
                    state.gate.borrow_mut().release();
                    state.dispatch();
                }
            });
            *state.frame.borrow_mut() = Some(handle);
        }
        ScrollScheduling::Debounce { wait_ms } => {
            let weak = Rc::downgrade(state);
            let timeout = Timeout::new(wait_ms, move || {
                if let Some(state) = weak.upgrade() {
                    state.dispatch();
                }
            });
            // Replacing the handle cancels the previous timer.
            *state.timeout.borrow_mut() = Some(timeout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_schedules_once() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.is_pending());
    }

    #[test]
    fn release_reopens_gate() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        gate.release();
        assert!(!gate.is_pending());
        assert!(gate.request());
    }
}
