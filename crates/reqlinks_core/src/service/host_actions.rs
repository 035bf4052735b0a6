//! Store operations triggered by the host rather than by a UI request.
//!
//! # Responsibility
//! - "Add current page to last requirement" (context-menu quick add).
//! - "Open all" links of a requirement in background tabs.
//!
//! # Invariants
//! - Notifications never change the outcome of the store call.

use crate::host::{NotificationSink, TabOpener};
use crate::model::link::{Link, NewLink};
use crate::model::requirement::RequirementId;
use crate::service::document_store::{DocumentStore, StoreResult};
use log::info;
use std::sync::Arc;

pub const NO_SELECTION_MESSAGE: &str = "Select or create a requirement first";
pub const MISSING_URL_MESSAGE: &str = "Unable to read the current tab";
/// Title stored when the current page reports none.
pub const UNTITLED_PAGE_TITLE: &str = "Untitled page";

/// Page the host is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub title: Option<String>,
    pub url: Option<String>,
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickAddOutcome {
    /// Link saved (or already present) under the last-selected requirement.
    Added(Link),
    NoSelection,
    MissingUrl,
}

pub struct HostActions {
    store: Arc<DocumentStore>,
    notifier: Arc<dyn NotificationSink>,
    tabs: Arc<dyn TabOpener>,
}

impl HostActions {
    pub fn new(
        store: Arc<DocumentStore>,
        notifier: Arc<dyn NotificationSink>,
        tabs: Arc<dyn TabOpener>,
    ) -> Self {
        Self {
            store,
            notifier,
            tabs,
        }
    }

    /// Adds `page` to the last-selected requirement and notifies the user.
    pub async fn quick_add(&self, page: &PageInfo) -> StoreResult<QuickAddOutcome> {
        let document = self.store.get().await?;
        let Some(id) = document.last_selected_requirement_id else {
            self.notifier.notify(NO_SELECTION_MESSAGE);
            return Ok(QuickAddOutcome::NoSelection);
        };
        let Some(url) = page.url.as_deref().filter(|url| !url.trim().is_empty()) else {
            self.notifier.notify(MISSING_URL_MESSAGE);
            return Ok(QuickAddOutcome::MissingUrl);
        };

        let title = page
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED_PAGE_TITLE);
        let input = NewLink::with_url(url)
            .titled(title)
            .favicon(page.favicon.clone().unwrap_or_default());
        let link = self.store.add_link(&id, input).await?;

        let shown = page
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(url);
        self.notifier.notify(&format!("Added: {shown}"));
        Ok(QuickAddOutcome::Added(link))
    }

    /// Opens every saved link of `id`. Returns how many tabs were requested.
    pub async fn open_all(&self, id: &RequirementId) -> StoreResult<usize> {
        let document = self.store.get().await?;
        let links = document.links_for(id);
        for link in links {
            self.tabs.open(&link.url);
        }
        info!(
            "event=open_all module=host status=ok req_id={id} count={}",
            links.len()
        );
        Ok(links.len())
    }
}
