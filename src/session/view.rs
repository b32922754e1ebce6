//! Card rendering as a pure projection.
//!
//! `render_cards` turns the card store into display rows. It never mutates
//! anything: search toggles the `visible` flag, missing or unresolvable
//! thumbnails fall back to the configured placeholder.

use serde::{Deserialize, Serialize};

use crate::cards::CardStore;
use crate::core::config::GalleryConfig;
use crate::core::entity::GameId;
use crate::resources::ResourceRegistry;

/// One rendered gallery card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    /// The record this row projects.
    pub id: GameId,

    /// Display name.
    pub name: String,

    /// Player count.
    pub players: u32,

    /// Like count.
    pub likes: u32,

    /// Thumbnail locator, or the placeholder when the record has none.
    pub thumbnail: String,

    /// Whether the card has previewable content.
    pub playable: bool,

    /// Whether the card matches the current search query.
    pub visible: bool,
}

/// Project the store into display rows, front (newest) first.
#[must_use]
pub fn render_cards(
    store: &CardStore,
    registry: &ResourceRegistry,
    config: &GalleryConfig,
    query: &str,
) -> Vec<CardView> {
    store
        .all()
        .iter()
        .map(|record| {
            let thumbnail = match record.thumbnail {
                Some(handle) => match registry.locator_of(handle) {
                    Ok(locator) => locator.to_string(),
                    Err(err) => {
                        // A displayed card's handles should be live; fall
                        // back rather than fail rendering.
                        log::warn!("thumbnail of {} unavailable: {err}", record.id);
                        config.placeholder_thumbnail.clone()
                    }
                },
                None => config.placeholder_thumbnail.clone(),
            };

            CardView {
                id: record.id,
                name: record.name.clone(),
                players: record.players,
                likes: record.likes,
                thumbnail,
                playable: record.content.is_some(),
                visible: record.matches_query(query),
            }
        })
        .collect()
}
