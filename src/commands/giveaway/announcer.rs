use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::{CreateAllowedMentions, CreateMessage, EditMessage};
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId, UserId};

use crate::commands::giveaway::formatters::{AnnouncementFormatter, DefaultAnnouncementFormatter};
use crate::commands::giveaway::models::EndOutcome;
use crate::db::GiveawayRecord;
use crate::error::Result;

// Delivers the outcome of a finished giveaway back to the channel it
// was announced in. Announcing is best-effort: by the time this trait
// is called the giveaway is already durably ended, and a delivery
// failure must never roll that back.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(
        &self,
        giveaway: &GiveawayRecord,
        outcome: &EndOutcome,
        participant_count: usize,
    ) -> Result<()>;
}

pub struct DiscordAnnouncer {
    http: Arc<Http>,
    formatter: Box<dyn AnnouncementFormatter>,
}

impl DiscordAnnouncer {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordAnnouncer {
            http,
            formatter: Box::new(DefaultAnnouncementFormatter::new()),
        }
    }

    // Replaces the original announcement embed and strips the join
    // button so late clicks have nothing to press.
    async fn update_announcement(
        &self,
        giveaway: &GiveawayRecord,
        winners: &[u64],
        participant_count: usize,
    ) -> Result<()> {
        let embed = self
            .formatter
            .finished_post(giveaway, winners, participant_count);
        ChannelId::new(giveaway.channel_id)
            .edit_message(
                &self.http,
                MessageId::new(giveaway.message_id),
                EditMessage::new().embed(embed).components(Vec::new()),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Announcer for DiscordAnnouncer {
    async fn announce(
        &self,
        giveaway: &GiveawayRecord,
        outcome: &EndOutcome,
        participant_count: usize,
    ) -> Result<()> {
        match outcome {
            // The caller lost the end race; there is nothing to say.
            EndOutcome::AlreadyEnded => Ok(()),
            EndOutcome::NoParticipants => {
                self.update_announcement(giveaway, &[], participant_count)
                    .await
            }
            EndOutcome::Winners(winners) => {
                self.update_announcement(giveaway, winners, participant_count)
                    .await?;

                let mentioned_users = winners
                    .iter()
                    .map(|user_id| UserId::new(*user_id))
                    .collect::<Vec<UserId>>();
                ChannelId::new(giveaway.channel_id)
                    .send_message(
                        &self.http,
                        CreateMessage::new()
                            .content(self.formatter.winners_line(giveaway, winners))
                            .allowed_mentions(CreateAllowedMentions::new().users(mentioned_users)),
                    )
                    .await?;

                Ok(())
            }
        }
    }
}
