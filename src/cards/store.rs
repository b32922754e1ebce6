//! Ordered collection of published game records.
//!
//! Insertion order is meaningful: new cards go to the front
//! (most-recent-first). Rendering and search are pure projections and never
//! mutate the store; the overlay commit path is the only writer after the
//! initial placeholder seeding.

use im::Vector;

use crate::core::entity::GameId;

use super::record::GameRecord;

/// In-memory ordered sequence of game records.
///
/// Backed by `im::Vector` so snapshots for rendering are O(1) clones.
///
/// ```
/// use gallery_engine::cards::{CardStore, GameRecord};
/// use gallery_engine::core::GameId;
///
/// let mut store = CardStore::new();
/// store.add(GameRecord::new(GameId::new(1), "First"));
/// store.add(GameRecord::new(GameId::new(2), "Second"));
///
/// // Most recent first
/// assert_eq!(store.all().front().unwrap().name, "Second");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    records: Vector<GameRecord>,
}

impl CardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record (most-recent-first).
    ///
    /// IDs are unique by generation; this is debug-asserted, not checked.
    pub fn add(&mut self, record: GameRecord) {
        debug_assert!(
            self.get(record.id).is_none(),
            "duplicate game id {}",
            record.id
        );
        self.records.push_front(record);
    }

    /// Append a record, preserving reading order.
    ///
    /// Only the initial placeholder population uses this.
    pub fn seed(&mut self, record: GameRecord) {
        debug_assert!(
            self.get(record.id).is_none(),
            "duplicate game id {}",
            record.id
        );
        self.records.push_back(record);
    }

    /// All records, front (newest) to back.
    #[must_use]
    pub fn all(&self) -> &Vector<GameRecord> {
        &self.records
    }

    /// O(1) snapshot of the current sequence.
    #[must_use]
    pub fn snapshot(&self) -> Vector<GameRecord> {
        self.records.clone()
    }

    /// Look up a record by ID.
    #[must_use]
    pub fn get(&self, id: GameId) -> Option<&GameRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records matching a predicate, in store order. Pure.
    pub fn filter<F>(&self, predicate: F) -> impl Iterator<Item = &GameRecord>
    where
        F: Fn(&GameRecord) -> bool,
    {
        self.records.iter().filter(move |r| predicate(r))
    }

    /// Records whose name contains `query`, case-insensitively. Pure.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a GameRecord> {
        self.filter(move |r| r.matches_query(query))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
