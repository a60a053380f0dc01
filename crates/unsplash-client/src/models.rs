// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;

/// Photo record as returned by the Unsplash API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    /// Unsplash photo ID (e.g. "Dwu85P9SOIk").
    pub id: String,
    /// Original width in pixels.
    pub width: NonZeroU32,
    /// Original height in pixels.
    pub height: NonZeroU32,
    #[serde(default)]
    pub description: Option<String>,
    /// Generated accessibility description.
    #[serde(default)]
    pub alt_description: Option<String>,
    /// Dominant colour as a hex string (e.g. "#6E633A").
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub blur_hash: Option<String>,
    #[serde(default)]
    pub likes: u64,
    /// Image URLs keyed by size variant ("raw", "full", "regular", "small", "thumb").
    pub urls: BTreeMap<String, String>,
    /// Photographer.
    pub user: PhotoUser,
    pub created_at: DateTime<Utc>,
}

impl Photo {
    /// URL for a size variant, if the API returned one.
    pub fn url(&self, size: &str) -> Option<&str> {
        self.urls.get(size).map(String::as_str)
    }
}

/// Reference to the user who uploaded a photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoUser {
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// One page of photo search results.
///
/// `results` keeps the order the API returned them in. An empty page with a
/// non-zero `total` (paging past the end) is a valid response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// Total number of matching photos.
    pub total: u64,
    pub total_pages: u64,
    pub results: Vec<Photo>,
}

impl SearchResponse {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<String>,
}
