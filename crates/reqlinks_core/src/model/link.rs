//! Saved link model.
//!
//! Links are immutable once built; replacing one means removing it and
//! adding a new record.

use crate::model::{now_epoch_ms, EpochMillis};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum number of characters kept from a link title.
pub const MAX_LINK_TITLE_CHARS: usize = 200;
/// Title used when neither a title nor a URL is available.
pub const DEFAULT_LINK_TITLE: &str = "Link";

const LINK_ID_PREFIX: &str = "lnk_";

/// Opaque link identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    pub fn generate() -> Self {
        Self(format!("{LINK_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for LinkId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LinkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Link input as sent by UI callers (`link:{title,url,favicon}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
}

impl NewLink {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }
}

/// Saved URL owned by exactly one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon: String,
    pub added_at: EpochMillis,
}

impl Link {
    /// Builds a link for `url` with defaults applied to title and favicon.
    ///
    /// Title precedence: non-empty `title`, then `url`, then
    /// [`DEFAULT_LINK_TITLE`]; the result is cut to [`MAX_LINK_TITLE_CHARS`].
    pub fn new(url: &str, title: Option<&str>, favicon: Option<&str>) -> Self {
        let title = title
            .filter(|value| !value.is_empty())
            .or(Some(url).filter(|value| !value.is_empty()))
            .unwrap_or(DEFAULT_LINK_TITLE);

        Self {
            id: LinkId::generate(),
            title: truncate_chars(title, MAX_LINK_TITLE_CHARS),
            url: url.to_string(),
            favicon: favicon.unwrap_or_default().to_string(),
            added_at: now_epoch_ms(),
        }
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
