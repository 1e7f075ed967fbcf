pub mod giveaway;
pub mod help;

use std::sync::Arc;

use poise::Context as PoiseContext;

use crate::commands::giveaway::controller::GiveawayController;
use crate::error::Error;

// User data, which is stored and accessible in all command invocations
pub struct UserData {
    pub controller: Arc<GiveawayController>,
}

// Generic context available across Poise commands
pub type Context<'a> = PoiseContext<'a, UserData, Error>;
