//! Validated song recommendation

use emotune_common::api::RecommendationItem;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Query suffix the embedded player expects
const PLAYER_QUERY: &str = "?utm_source=generator";

/// One ranked song recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub artist: String,
    pub album_art_url: Option<String>,
    /// Inline player link; absent means no preview
    pub embed_url: Option<String>,
}

impl Recommendation {
    /// Validate one wire item; `None` if it has no title
    pub fn from_item(item: RecommendationItem) -> Option<Self> {
        let title = non_empty(item.title)?;
        Some(Self {
            title,
            artist: non_empty(item.artist).unwrap_or_else(|| "Unknown Artist".to_string()),
            album_art_url: item.album_art.and_then(http_url),
            embed_url: item.embed_url.and_then(http_url),
        })
    }

    pub fn is_playable(&self) -> bool {
        self.embed_url.is_some()
    }

    /// Player source URL for the selected track
    pub fn player_url(&self) -> Option<String> {
        self.embed_url
            .as_ref()
            .map(|url| format!("{}{}", url, PLAYER_QUERY))
    }
}

/// Validate a backend list, keeping backend order
pub fn normalize_recommendations(items: Vec<RecommendationItem>) -> Vec<Recommendation> {
    let total = items.len();
    let songs: Vec<Recommendation> = items
        .into_iter()
        .filter_map(Recommendation::from_item)
        .collect();
    if songs.len() < total {
        warn!(
            dropped = total - songs.len(),
            kept = songs.len(),
            "Dropped recommendations without a title"
        );
    }
    songs
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn http_url(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Some(trimmed.to_string())
    } else {
        None
    }
}
