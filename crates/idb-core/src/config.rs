use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration, read from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// Name used for the log filter and startup banner.
    pub bot_name: String,

    // Scores
    pub scores_file: PathBuf,

    // Inline mode
    pub inline_cache_time: u32,

    // Rating
    pub rating_update_interval: Duration,
    pub rating_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in `load`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let bot_name = lookup("BOT_NAME")
            .and_then(non_empty)
            .unwrap_or_else(|| "idbot".to_string());

        let scores_file = PathBuf::from(
            lookup("SCORES_FILE")
                .and_then(non_empty)
                .unwrap_or_else(|| "idbot-scores.json".to_string()),
        );

        let inline_cache_time = parse_num::<u32>(&lookup, "INLINE_CACHE_TIME")?.unwrap_or(31);

        let rating_update_seconds =
            parse_num::<u64>(&lookup, "RATING_UPDATE_SECONDS")?.unwrap_or(60);
        if rating_update_seconds == 0 {
            return Err(Error::Config(
                "RATING_UPDATE_SECONDS must be greater than zero".to_string(),
            ));
        }
        let rating_limit = parse_num::<usize>(&lookup, "RATING_LIMIT")?.unwrap_or(10);

        Ok(Self {
            telegram_bot_token,
            bot_name,
            scores_file,
            inline_cache_time,
            rating_update_interval: Duration::from_secs(rating_update_seconds),
            rating_limit,
        })
    }
}

fn parse_num<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
