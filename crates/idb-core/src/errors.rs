/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type. A malformed inline
/// message id is an `inline_id::DecodeError` and never ends up here, so it
/// cannot be confused with a Telegram transport failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
