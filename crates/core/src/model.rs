//! The resolved content record for one show instance.

use serde::{Deserialize, Serialize};

/// Entity kind used when deriving cache keys for show details.
pub const SHOW_DETAILS_KIND: &str = "ShowDetails";

/// Supplementary content for one scheduled show.
///
/// Serialized as `{"showId": "...", "description": "..."}`, which is also the
/// document shape stored in the content repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDetails {
    pub show_id: String,
    #[serde(default)]
    pub description: String,
}

impl ShowDetails {
    pub fn new(show_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self { show_id: show_id.into(), description: description.into() }
    }

    /// Placeholder stored for shows whose content could not be resolved.
    pub fn empty(show_id: impl Into<String>) -> Self {
        Self::new(show_id, String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
    }
}
