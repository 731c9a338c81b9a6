// One-shot visibility watching.
// Each target fires at most once: an explicit consumed flag plus an explicit unobserve,
// so the behavior does not depend on how the platform detaches.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::SiteError;
use crate::types::WatchSettings;

/// Tracks which watched items have already fired.
#[derive(Debug, Clone)]
pub struct WatchSet<T> {
    entries: Vec<(T, bool)>,
}

impl<T: PartialEq> WatchSet<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        WatchSet {
            entries: items.into_iter().map(|item| (item, false)).collect(),
        }
    }

    /// Mark `item` consumed. Returns `true` only the first time for a watched item.
    pub fn claim(&mut self, item: &T) -> bool {
        match self.entries.iter_mut().find(|(t, _)| t == item) {
            Some((_, consumed)) if !*consumed => {
                *consumed = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_consumed(&self, item: &T) -> bool {
        self.entries
            .iter()
            .any(|(t, consumed)| t == item && *consumed)
    }

    /// Items still waiting for their first trigger.
    pub fn remaining(&self) -> usize {
        self.entries.iter().filter(|(_, consumed)| !consumed).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// IntersectionObserver that calls `on_first` once per target, then stops watching it.
/// Dropping the watcher disconnects the observer.
pub struct OneShotWatcher {
    observer: IntersectionObserver,
    targets: Rc<RefCell<WatchSet<Element>>>,
    _callback: EntriesCallback,
}

impl OneShotWatcher {
    pub fn new<F>(targets: Vec<Element>, settings: &WatchSettings, on_first: F) -> Result<Self, SiteError>
    where
        F: Fn(&Element) + 'static,
    {
        let set = Rc::new(RefCell::new(WatchSet::new(targets.iter().cloned())));

        let callback = {
            let set = Rc::clone(&set);
            EntriesCallback::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    let first = set.borrow_mut().claim(&target);
                    observer.unobserve(&target);
                    if first {
                        on_first(&target);
                    }
                }
            })
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(settings.threshold));
        init.set_root_margin(&settings.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        for target in &targets {
            observer.observe(target);
        }

        Ok(OneShotWatcher {
            observer,
            targets: set,
            _callback: callback,
        })
    }

    /// Targets that have not fired yet.
    pub fn remaining(&self) -> usize {
        self.targets.borrow().remaining()
    }
}

impl Drop for OneShotWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
