//! Messenger abstractions (Telegram adapter lives in `idb-telegram`).

pub mod port;
pub mod types;
