use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::commands::giveaway::controller::GiveawayController;

// Runs the expiry sweep on a fixed interval until the process stops.
// The sweep keeps no state between ticks, so aborting this task at any
// point (e.g. on shutdown) can't corrupt a giveaway: the conditional
// end transition in the store is all-or-nothing.
pub fn spawn_sweeper(controller: Arc<GiveawayController>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("The giveaway sweeper runs every {:?}", interval);

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match controller.sweep().await {
                Ok(0) => (),
                Ok(ended) => info!("The sweep finished {} expired giveaway(s)", ended),
                Err(err) => error!("The giveaway sweep failed: {}", err),
            }
        }
    })
}
