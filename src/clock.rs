use chrono::{DateTime, Utc};

// Source of "now" for the giveaway lifecycle. Injected into the
// controller so that expiry checks can be driven by a frozen clock
// in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
