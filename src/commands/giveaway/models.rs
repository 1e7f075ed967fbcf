use chrono::{DateTime, Utc};

// Validated input for creating a giveaway, produced by the command
// handler once the announcement message has been posted.
#[derive(Debug, Clone)]
pub struct CreateGiveaway {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub prize: String,
    pub winner_count: u32,
    pub end_time: DateTime<Utc>,
    pub created_by: u64,
    pub requirements: Option<String>,
}

// The result of a join attempt. A repeated join is informational,
// not an error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

// The result of an end attempt. Exactly one caller observes `Winners`
// or `NoParticipants` for a given giveaway; everyone who loses the
// race gets `AlreadyEnded` and must stay silent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EndOutcome {
    Winners(Vec<u64>),
    NoParticipants,
    AlreadyEnded,
}
