pub mod models;
pub mod store;

pub use crate::db::models::{GiveawayRecord, NewGiveaway};
pub use crate::db::store::GiveawayStore;
