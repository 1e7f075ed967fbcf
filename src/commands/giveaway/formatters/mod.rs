pub mod announcement;
pub mod base;

pub use crate::commands::giveaway::formatters::announcement::DefaultAnnouncementFormatter;
pub use crate::commands::giveaway::formatters::base::{AnnouncementFormatter, GiveawayPost};
