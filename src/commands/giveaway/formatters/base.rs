use chrono::{DateTime, Utc};
use serenity::builder::CreateEmbed;

use crate::db::GiveawayRecord;

// Input for rendering the initial announcement post. The giveaway has
// no stored identity yet at this point: the record is created only
// after the message is on the channel.
pub struct GiveawayPost<'a> {
    pub prize: &'a str,
    pub description: Option<&'a str>,
    pub winner_count: u32,
    pub end_time: DateTime<Utc>,
    pub requirements: Option<&'a str>,
    pub created_by: u64,
}

pub trait AnnouncementFormatter: Send + Sync {
    // The embed posted when a giveaway is created.
    fn giveaway_post(&self, post: &GiveawayPost<'_>) -> CreateEmbed;
    // The embed that replaces the announcement once the giveaway is
    // over. An empty winner list means nobody joined.
    fn finished_post(
        &self,
        giveaway: &GiveawayRecord,
        winners: &[u64],
        participant_count: usize,
    ) -> CreateEmbed;
    // The congratulation message sent to the channel for the winners.
    fn winners_line(&self, giveaway: &GiveawayRecord, winners: &[u64]) -> String;
}
