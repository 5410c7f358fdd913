use std::sync::Arc;

use idb_core::{
    config::Config,
    scores::{JsonFileScoreStore, ScoreStore},
};

#[tokio::main]
async fn main() -> Result<(), idb_core::Error> {
    let cfg = Arc::new(Config::load()?);
    idb_core::logging::init(&cfg.bot_name)?;

    let scores: Arc<dyn ScoreStore> = Arc::new(JsonFileScoreStore::open(&cfg.scores_file).await?);

    idb_telegram::router::run_polling(cfg, scores)
        .await
        .map_err(|e| idb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
