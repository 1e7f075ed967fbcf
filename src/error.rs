use std::result;

use serenity::prelude::SerenityError;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum Error {
    // The user supplied something the bot can't work with (bad duration,
    // winner count out of range, empty prize). Never reaches the store.
    #[error("{0}")]
    Validation(String),
    #[error("This giveaway has already finished.")]
    GiveawayClosed,
    #[error("The requested giveaway was not found.")]
    GiveawayNotFound,
    // The SQLite layer failed. Carried as a string so the error stays
    // comparable in tests.
    #[error("{0}")]
    Persistence(String),
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Serenity(String),
}

impl From<SerenityError> for Error {
    fn from(err: SerenityError) -> Error {
        let description = err.to_string();
        Error::Serenity(description)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        let description = err.to_string();
        Error::Persistence(description)
    }
}
