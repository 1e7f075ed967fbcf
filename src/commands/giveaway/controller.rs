use std::cmp;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::commands::giveaway::announcer::Announcer;
use crate::commands::giveaway::models::{CreateGiveaway, EndOutcome, JoinOutcome};
use crate::commands::giveaway::parser::parse_duration;
use crate::db::{GiveawayRecord, GiveawayStore, NewGiveaway};
use crate::error::{Error, Result};

// Orchestrates the giveaway lifecycle: creation, participation, manual
// termination and the periodic sweep. The controller holds no durable
// state of its own; everything it knows is re-derived from the store,
// so a process restart loses nothing.
pub struct GiveawayController {
    store: Arc<GiveawayStore>,
    clock: Arc<dyn Clock>,
    announcer: Arc<dyn Announcer>,
    max_winners: u32,
}

impl GiveawayController {
    pub fn new(
        store: Arc<GiveawayStore>,
        clock: Arc<dyn Clock>,
        announcer: Arc<dyn Announcer>,
        max_winners: u32,
    ) -> Self {
        GiveawayController {
            store,
            clock,
            announcer,
            max_winners,
        }
    }

    // Business-rule validation that must pass before anything is
    // posted or persisted.
    pub fn validate_new_giveaway(&self, prize: &str, winner_count: u32) -> Result<()> {
        if prize.trim().is_empty() {
            let message = "The prize can't be empty.".to_string();
            return Err(Error::Validation(message));
        }

        if winner_count < 1 || winner_count > self.max_winners {
            let message = format!(
                "The number of winners must be between 1 and {}.",
                self.max_winners
            );
            return Err(Error::Validation(message));
        }

        Ok(())
    }

    // Turns a user-supplied duration into an absolute end time and
    // rejects anything that doesn't land in the future.
    pub fn resolve_end_time(&self, duration: &str) -> Result<DateTime<Utc>> {
        let parsed = parse_duration(duration)?;
        let now = self.clock.now();
        let end_time = parsed
            .as_duration()
            .and_then(|duration| now.checked_add_signed(duration))
            .ok_or_else(|| Error::Validation("The duration value is too large.".to_string()))?;

        if end_time <= now {
            let message = "The giveaway must end in the future.".to_string();
            return Err(Error::Validation(message));
        }

        Ok(end_time)
    }

    // Persists a validated giveaway and returns its identity.
    pub async fn create(&self, request: CreateGiveaway) -> Result<i64> {
        self.validate_new_giveaway(&request.prize, request.winner_count)?;

        let now = self.clock.now();
        if request.end_time <= now {
            let message = "The giveaway must end in the future.".to_string();
            return Err(Error::Validation(message));
        }

        let giveaway = NewGiveaway {
            guild_id: request.guild_id,
            channel_id: request.channel_id,
            message_id: request.message_id,
            prize: request.prize,
            winner_count: request.winner_count,
            end_time: request.end_time,
            created_by: request.created_by,
            requirements: request.requirements,
            created_at: now,
        };
        let giveaway_id = self.store.create_giveaway(&giveaway).await?;
        info!("Created giveaway #{}", giveaway_id);

        Ok(giveaway_id)
    }

    // Registers the user for the giveaway behind the given announcement
    // message. Joining twice is an informational outcome, not an error;
    // joining a finished giveaway is rejected.
    pub async fn join(&self, guild_id: u64, message_id: u64, user_id: u64) -> Result<JoinOutcome> {
        let giveaway = self
            .store
            .get_giveaway_by_message(guild_id, message_id)
            .await?
            .ok_or(Error::GiveawayNotFound)?;

        if !giveaway.active {
            return Err(Error::GiveawayClosed);
        }

        let joined = self
            .store
            .add_participant(giveaway.id, user_id, self.clock.now())
            .await?;

        match joined {
            true => Ok(JoinOutcome::Joined),
            false => Ok(JoinOutcome::AlreadyJoined),
        }
    }

    // Ends a giveaway exactly once. The conditional update inside
    // `mark_ended` is the only serialization point: whichever caller
    // flips the flag computes winners and announces, every other caller
    // observes `AlreadyEnded` and takes no further action.
    pub async fn end(&self, giveaway: &GiveawayRecord) -> Result<EndOutcome> {
        let changed = self.store.mark_ended(giveaway.id).await?;
        if !changed {
            return Ok(EndOutcome::AlreadyEnded);
        }

        let participants = self.store.list_participants(giveaway.id).await?;
        let participant_count = participants.len();
        let outcome = match participants.is_empty() {
            true => EndOutcome::NoParticipants,
            false => EndOutcome::Winners(select_winners(participants, giveaway.winner_count)),
        };

        // The giveaway is concluded at this point no matter what
        // happens to the announcement.
        if let Err(err) = self
            .announcer
            .announce(giveaway, &outcome, participant_count)
            .await
        {
            warn!(
                "Can't announce the results of giveaway #{}: {}",
                giveaway.id, err
            );
        }

        Ok(outcome)
    }

    // Manual termination through the `end` command.
    pub async fn end_by_message(
        &self,
        guild_id: u64,
        message_id: u64,
    ) -> Result<(GiveawayRecord, EndOutcome)> {
        let giveaway = self
            .store
            .get_giveaway_by_message(guild_id, message_id)
            .await?
            .ok_or(Error::GiveawayNotFound)?;

        let outcome = self.end(&giveaway).await?;
        Ok((giveaway, outcome))
    }

    // Ends every expired active giveaway and returns how many were
    // finished by this call. The sweep is stateless: it re-derives the
    // expired set from the store each cycle, so a missed run self-heals
    // on the next one. A failure on one giveaway never stops the batch.
    pub async fn sweep(&self) -> Result<usize> {
        let now = self.clock.now();
        let active = self.store.list_active().await?;

        let mut ended = 0;
        for giveaway in active {
            if giveaway.end_time > now {
                continue;
            }

            match self.end(&giveaway).await {
                Ok(EndOutcome::AlreadyEnded) => (),
                Ok(_) => {
                    info!("The sweep finished giveaway #{}", giveaway.id);
                    ended += 1;
                }
                Err(err) => {
                    error!("Can't finish giveaway #{}: {}", giveaway.id, err);
                }
            }
        }

        Ok(ended)
    }

    // Active giveaways of a guild, soonest ending first.
    pub async fn list_for_guild(&self, guild_id: u64) -> Result<Vec<GiveawayRecord>> {
        self.store.list_active_for_guild(guild_id).await
    }
}

// Uniform sampling without replacement: repeatedly pick a random index
// from the remaining pool and remove it. Every subset of the required
// size is equally likely and nobody can win twice.
fn select_winners(mut pool: Vec<u64>, winner_count: u32) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    let slots = cmp::min(winner_count as usize, pool.len());

    let mut winners = Vec::with_capacity(slots);
    for _ in 0..slots {
        let index = rng.gen_range(0..pool.len());
        winners.push(pool.remove(index));
    }

    winners
}
