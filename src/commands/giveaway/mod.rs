pub mod announcer;
pub mod controller;
pub mod formatters;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod sweep;

pub use crate::commands::giveaway::handlers::{giveaway, handle_component_interaction};
