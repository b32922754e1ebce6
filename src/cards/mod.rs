//! Game cards: records and the ordered store that holds them.

pub mod record;
pub mod store;

pub use record::GameRecord;
pub use store::CardStore;
