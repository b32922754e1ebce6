//! Game records: the data behind a gallery card.

use serde::{Deserialize, Serialize};

use crate::core::entity::GameId;
use crate::resources::ResourceHandle;

/// A published game card.
///
/// `content` and `thumbnail`, when present, must reference live resources
/// until explicitly released; the overlay commit path is the only way a
/// handle gets here, which is what keeps that invariant.
///
/// ```
/// use gallery_engine::cards::GameRecord;
/// use gallery_engine::core::GameId;
///
/// let record = GameRecord::new(GameId::new(1), "Blank map").with_popularity(12, 340);
/// assert_eq!(record.players, 12);
/// assert!(record.content.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unique identifier within the card store.
    pub id: GameId,

    /// Display name.
    pub name: String,

    /// Current player count.
    pub players: u32,

    /// Like count.
    pub likes: u32,

    /// Uploaded or composed content, if any.
    pub content: Option<ResourceHandle>,

    /// Thumbnail image, if any.
    pub thumbnail: Option<ResourceHandle>,
}

impl GameRecord {
    /// Create a record with zero players and likes and no resources.
    pub fn new(id: GameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            players: 0,
            likes: 0,
            content: None,
            thumbnail: None,
        }
    }

    /// Attach a content handle.
    #[must_use]
    pub fn with_content(mut self, handle: ResourceHandle) -> Self {
        self.content = Some(handle);
        self
    }

    /// Attach a thumbnail handle.
    #[must_use]
    pub fn with_thumbnail(mut self, handle: ResourceHandle) -> Self {
        self.thumbnail = Some(handle);
        self
    }

    /// Set player and like counts.
    #[must_use]
    pub fn with_popularity(mut self, players: u32, likes: u32) -> Self {
        self.players = players;
        self.likes = likes;
        self
    }

    /// Case-insensitive substring match on the name.
    ///
    /// The empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// All resource handles this record owns.
    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.content.into_iter().chain(self.thumbnail)
    }
}
