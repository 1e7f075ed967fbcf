pub mod clock;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;

use poise::serenity_prelude::{FullEvent, GatewayIntents, Interaction};
use serenity::client::Client;
use tracing::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::commands::UserData;
use crate::commands::giveaway::announcer::DiscordAnnouncer;
use crate::commands::giveaway::controller::GiveawayController;
use crate::commands::giveaway::sweep::spawn_sweeper;
use crate::config::BotConfig;
use crate::db::GiveawayStore;
use crate::error::Error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return;
        }
    };

    let store = match GiveawayStore::open(&config.database_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!("Cannot open the giveaway database: {}", err);
            return;
        }
    };

    let token = config.token.clone();
    let sweep_interval = config.sweep_interval;
    let max_winners = config.max_winners;

    let framework = poise::Framework::<UserData, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::giveaway::giveaway(), commands::help::help()],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    if let FullEvent::InteractionCreate {
                        interaction: Interaction::Component(component),
                    } = event
                    {
                        commands::giveaway::handle_component_interaction(ctx, component, data)
                            .await?;
                    }

                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("{} is connected!", ready.user.name);

                let clock: Arc<dyn Clock> = Arc::new(SystemClock);
                let announcer = Arc::new(DiscordAnnouncer::new(ctx.http.clone()));
                let controller = Arc::new(GiveawayController::new(
                    store,
                    clock,
                    announcer,
                    max_winners,
                ));
                let _sweeper = spawn_sweeper(controller.clone(), sweep_interval);

                Ok(UserData { controller })
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged();
    let mut client = Client::builder(&token, intents)
        .framework(framework)
        .await
        .expect("Cannot create a Discord client");

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
