use chrono::{DateTime, Utc};

// A persisted giveaway row. The `active` flag is true from creation
// until exactly one successful end transition and never flips back.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawayRecord {
    pub id: i64,
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub prize: String,
    pub winner_count: u32,
    pub end_time: DateTime<Utc>,
    pub created_by: u64,
    pub requirements: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// Everything required to insert a new giveaway. The message id points
// at the announcement post so that join buttons and manual `end` calls
// can find the record again.
#[derive(Debug, Clone)]
pub struct NewGiveaway {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub prize: String,
    pub winner_count: u32,
    pub end_time: DateTime<Utc>,
    pub created_by: u64,
    pub requirements: Option<String>,
    pub created_at: DateTime<Utc>,
}
