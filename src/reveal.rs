// Visibility-triggered animator: cards and screenshots fade in once per page load.

use crate::dom::{self, Disposer};
use crate::error::SiteError;
use crate::page::Page;
use crate::types::CLASS_REVEALED;
use crate::watch::OneShotWatcher;

pub fn install(page: &Page) -> Result<Disposer, SiteError> {
    let mut disposer = Disposer::new("reveal");
    let targets = page.query_all(&page.config.selectors.reveal);
    if targets.is_empty() {
        return Ok(disposer);
    }

    let watcher = OneShotWatcher::new(targets, &page.config.reveal, |element| {
        dom::add_class(element, CLASS_REVEALED);
    })?;
    tracing::debug!(targets = watcher.remaining(), "reveal watcher attached");
    disposer.watch(watcher);
    Ok(disposer)
}
