use poise::CreateReply;
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage,
};
use serenity::model::Colour;
use serenity::model::application::{ButtonStyle, ComponentInteraction};
use tracing::error;

use crate::commands::giveaway::formatters::{
    AnnouncementFormatter, DefaultAnnouncementFormatter, GiveawayPost,
};
use crate::commands::giveaway::models::{CreateGiveaway, EndOutcome, JoinOutcome};
use crate::commands::{Context, UserData};
use crate::error::{Error, Result};

// Custom id of the join button under every giveaway announcement. The
// giveaway itself is resolved from the message the button sits on.
pub const JOIN_BUTTON_ID: &str = "giveaway_join";

const GENERIC_FAILURE: &str = "❌ Something went wrong. Please try again later.";

#[poise::command(
    slash_command,
    guild_only,
    subcommands("create", "end", "list"),
    default_member_permissions = "MANAGE_GUILD",
    description_localized("en-US", "Manage giveaways")
)]
pub async fn giveaway(_ctx: Context<'_>) -> Result<()> {
    // Only the subcommands are invokable.
    Ok(())
}

/// Create a new giveaway
#[poise::command(slash_command, guild_only)]
pub async fn create(
    ctx: Context<'_>,
    #[description = "The prize to win"] prize: String,
    #[description = "Number of winners"]
    #[min = 1]
    #[max = 10]
    winners: u32,
    #[description = "Giveaway duration (e.g. 30s, 5m, 2h, 1d, 1w)"] duration: String,
    #[description = "Giveaway description"] description: Option<String>,
    #[description = "Requirements to participate"] requirements: Option<String>,
) -> Result<()> {
    let controller = &ctx.data().controller;

    // Validate everything before the announcement hits the channel.
    let validation = controller
        .validate_new_giveaway(&prize, winners)
        .and_then(|_| controller.resolve_end_time(&duration));
    let end_time = match validation {
        Ok(end_time) => end_time,
        Err(Error::Validation(message)) => {
            reply_ephemeral(ctx, format!("❌ {}", message)).await?;
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let formatter = DefaultAnnouncementFormatter::new();
    let embed = formatter.giveaway_post(&GiveawayPost {
        prize: &prize,
        description: description.as_deref(),
        winner_count: winners,
        end_time,
        requirements: requirements.as_deref(),
        created_by: ctx.author().id.get(),
    });
    let components = vec![CreateActionRow::Buttons(vec![
        CreateButton::new(JOIN_BUTTON_ID)
            .label("Join")
            .emoji('🎉')
            .style(ButtonStyle::Primary),
    ])];

    let announcement = ctx
        .channel_id()
        .send_message(
            ctx.http(),
            CreateMessage::new()
                .content("🎉 **NEW GIVEAWAY!** 🎉")
                .embed(embed)
                .components(components),
        )
        .await?;

    let request = CreateGiveaway {
        guild_id: ctx.guild_id().map(|id| id.get()).unwrap_or_default(),
        channel_id: ctx.channel_id().get(),
        message_id: announcement.id.get(),
        prize,
        winner_count: winners,
        end_time,
        created_by: ctx.author().id.get(),
        requirements,
    };
    match controller.create(request).await {
        Ok(_) => {
            let confirmation = format!(
                "✅ The giveaway has been created! [Open it]({})",
                announcement.link()
            );
            reply_ephemeral(ctx, confirmation).await?;
        }
        Err(err) => {
            error!("Can't create the giveaway: {}", err);
            reply_ephemeral(ctx, GENERIC_FAILURE.to_string()).await?;
        }
    }

    Ok(())
}

/// Finish a giveaway ahead of its schedule
#[poise::command(slash_command, guild_only)]
pub async fn end(
    ctx: Context<'_>,
    #[description = "Message id of the giveaway post"] message_id: String,
) -> Result<()> {
    let message_id = match message_id.trim().parse::<u64>() {
        Ok(message_id) => message_id,
        Err(_) => {
            reply_ephemeral(ctx, "❌ Invalid message id.".to_string()).await?;
            return Ok(());
        }
    };

    let guild_id = ctx.guild_id().map(|id| id.get()).unwrap_or_default();
    let content = match ctx.data().controller.end_by_message(guild_id, message_id).await {
        Ok((_, EndOutcome::Winners(winners))) => {
            format!("✅ Giveaway finished with {} winner(s)!", winners.len())
        }
        Ok((_, EndOutcome::NoParticipants)) => {
            "✅ Giveaway finished. Nobody joined this one.".to_string()
        }
        Ok((_, EndOutcome::AlreadyEnded)) => {
            "ℹ️ This giveaway has already been finished.".to_string()
        }
        Err(Error::GiveawayNotFound) => "❌ The requested giveaway was not found.".to_string(),
        Err(err) => {
            error!("Can't finish the giveaway: {}", err);
            GENERIC_FAILURE.to_string()
        }
    };
    reply_ephemeral(ctx, content).await?;

    Ok(())
}

/// List the active giveaways of this server
#[poise::command(slash_command, guild_only)]
pub async fn list(ctx: Context<'_>) -> Result<()> {
    let guild_id = ctx.guild_id().map(|id| id.get()).unwrap_or_default();
    let giveaways = match ctx.data().controller.list_for_guild(guild_id).await {
        Ok(giveaways) => giveaways,
        Err(err) => {
            error!("Can't list the active giveaways: {}", err);
            reply_ephemeral(ctx, GENERIC_FAILURE.to_string()).await?;
            return Ok(());
        }
    };

    if giveaways.is_empty() {
        reply_ephemeral(ctx, "📭 There are no active giveaways at the moment.".to_string())
            .await?;
        return Ok(());
    }

    let mut embed = CreateEmbed::new()
        .colour(Colour::new(0x0099FF))
        .title("🎉 Active Giveaways")
        .description(format!("{} giveaway(s) currently running:", giveaways.len()));
    for giveaway in &giveaways {
        embed = embed.field(
            format!("🎁 {}", giveaway.prize),
            format!(
                "**ID:** {}\n**Winners:** {}\n**Ends:** <t:{}:R>\n**Created by:** <@{}>",
                giveaway.message_id,
                giveaway.winner_count,
                giveaway.end_time.timestamp(),
                giveaway.created_by,
            ),
            false,
        );
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

// Handles a press on the join button. The replies mirror the command
// surface: repeated joins and finished giveaways are friendly notices,
// storage failures are a generic apology plus a log line.
pub async fn handle_component_interaction(
    ctx: &serenity::client::Context,
    interaction: &ComponentInteraction,
    data: &UserData,
) -> Result<()> {
    if interaction.data.custom_id != JOIN_BUTTON_ID {
        return Ok(());
    }

    let guild_id = interaction.guild_id.map(|id| id.get()).unwrap_or_default();
    let message_id = interaction.message.id.get();
    let user_id = interaction.user.id.get();

    let content = match data.controller.join(guild_id, message_id, user_id).await {
        Ok(JoinOutcome::Joined) => "✅ You joined the giveaway! Good luck! 🍀".to_string(),
        Ok(JoinOutcome::AlreadyJoined) => {
            "ℹ️ You are already participating in this giveaway!".to_string()
        }
        Err(Error::GiveawayClosed) => "❌ This giveaway has already finished.".to_string(),
        Err(Error::GiveawayNotFound) => "❌ The requested giveaway was not found.".to_string(),
        Err(err) => {
            error!("Can't join the giveaway: {}", err);
            GENERIC_FAILURE.to_string()
        }
    };

    interaction
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

async fn reply_ephemeral(ctx: Context<'_>, content: String) -> Result<()> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await
        .map_err(Error::from)?;
    Ok(())
}
