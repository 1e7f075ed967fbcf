// Default rendering of the giveaway announcement, the finished post
// and the congratulation line.
use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::Colour;

use crate::commands::giveaway::formatters::base::{AnnouncementFormatter, GiveawayPost};
use crate::db::GiveawayRecord;

const GIVEAWAY_COLOUR: Colour = Colour::new(0xFF6B6B);
const FINISHED_COLOUR: Colour = Colour::new(0x00FF00);
const NO_PARTICIPANTS_COLOUR: Colour = Colour::new(0xFF0000);

pub struct DefaultAnnouncementFormatter;

impl DefaultAnnouncementFormatter {
    pub fn new() -> Self {
        DefaultAnnouncementFormatter {}
    }
}

impl AnnouncementFormatter for DefaultAnnouncementFormatter {
    fn giveaway_post(&self, post: &GiveawayPost<'_>) -> CreateEmbed {
        let description = format!(
            "**{}**\n\n{}\n\nHosted by <@{}>",
            post.prize,
            post.description.unwrap_or("No description provided."),
            post.created_by,
        );

        let end_timestamp = post.end_time.timestamp();
        let mut embed = CreateEmbed::new()
            .colour(GIVEAWAY_COLOUR)
            .title("🎉 GIVEAWAY 🎉")
            .description(description)
            .field("👑 Winners", format!("{} winner(s)", post.winner_count), true)
            .field("⏰ Ends at", format!("<t:{}:F>", end_timestamp), true)
            .field("⏳ Time left", format!("<t:{}:R>", end_timestamp), true);

        if let Some(requirements) = post.requirements {
            embed = embed.field("📋 Requirements", requirements, false);
        }

        embed
    }

    fn finished_post(
        &self,
        giveaway: &GiveawayRecord,
        winners: &[u64],
        participant_count: usize,
    ) -> CreateEmbed {
        match winners.is_empty() {
            true => CreateEmbed::new()
                .colour(NO_PARTICIPANTS_COLOUR)
                .title("🎉 Giveaway Finished")
                .description(format!(
                    "**{}**\n\nNobody joined this giveaway.",
                    giveaway.prize
                ))
                .footer(CreateEmbedFooter::new("Giveaway finished")),
            false => CreateEmbed::new()
                .colour(FINISHED_COLOUR)
                .title("🎉 Giveaway Finished!")
                .description(format!(
                    "**Prize:** {}\n\n**Winner(s):** {}\n\nCongratulations!",
                    giveaway.prize,
                    mention_list(winners),
                ))
                .footer(CreateEmbedFooter::new(format!(
                    "{} winner(s) out of {} participant(s)",
                    winners.len(),
                    participant_count,
                ))),
        }
    }

    fn winners_line(&self, giveaway: &GiveawayRecord, winners: &[u64]) -> String {
        format!(
            "🎉 Congratulations {}! You won **{}**!",
            mention_list(winners),
            giveaway.prize,
        )
    }
}

// Renders user ids as a comma-separated list of Discord mentions.
fn mention_list(user_ids: &[u64]) -> String {
    user_ids
        .iter()
        .map(|user_id| format!("<@{}>", user_id))
        .collect::<Vec<String>>()
        .join(", ")
}
