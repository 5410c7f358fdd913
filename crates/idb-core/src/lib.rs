//! Core logic for the Telegram ID bot.
//!
//! This crate is framework-agnostic. Telegram lives behind `MessagingPort`,
//! implemented in `idb-telegram`; score persistence lives behind `ScoreStore`.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod inline;
pub mod inline_id;
pub mod logging;
pub mod messaging;
pub mod rating;
pub mod replies;
pub mod scores;
pub mod texts;

pub use errors::{Error, Result};
