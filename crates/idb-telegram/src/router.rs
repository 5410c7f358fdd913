use std::sync::Arc;

use teloxide::{
    dispatching::Dispatcher,
    dptree,
    prelude::*,
    types::{BotCommand, Chat},
};

use tokio_util::sync::CancellationToken;

use idb_core::{
    config::Config, domain::ChatKind, messaging::port::MessagingPort, rating::RatingBoard,
    scores::ScoreStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub scores: Arc<dyn ScoreStore>,
    pub rating: Arc<RatingBoard>,
}

pub fn chat_kind(chat: &Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Group
    }
}

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("id", "Tell your ID or group's ID"),
        BotCommand::new("help", "Help"),
    ]
}

pub async fn run_polling(cfg: Arc<Config>, scores: Arc<dyn ScoreStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(bot = %cfg.bot_name, username = %me.username(), "bot started"),
        Err(e) => tracing::warn!(error = %e, "get_me failed"),
    }

    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        tracing::warn!(error = %e, "set_my_commands failed");
    }

    let rating = Arc::new(RatingBoard::new(scores.clone(), cfg.rating_limit));
    let refresher_cancel = CancellationToken::new();
    let refresher = rating.spawn_refresher(cfg.rating_update_interval, refresher_cancel.clone());

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        messenger,
        scores,
        rating,
    });

    let handler = dptree::entry()
        .branch(Update::filter_inline_query().endpoint(handlers::handle_inline_query))
        .branch(Update::filter_chosen_inline_result().endpoint(handlers::handle_chosen_inline))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_my_chat_member().endpoint(handlers::handle_my_chat_member))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    refresher_cancel.cancel();
    let _ = refresher.await;
    tracing::info!("bot stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(json: &str) -> Chat {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn maps_chat_kinds() {
        assert_eq!(
            chat_kind(&chat(r#"{"id": 1, "type": "private", "first_name": "A"}"#)),
            ChatKind::Private
        );
        assert_eq!(
            chat_kind(&chat(r#"{"id": -2, "type": "group", "title": "G"}"#)),
            ChatKind::Group
        );
        assert_eq!(
            chat_kind(&chat(r#"{"id": -1003, "type": "supergroup", "title": "S"}"#)),
            ChatKind::Supergroup
        );
        assert_eq!(
            chat_kind(&chat(r#"{"id": -1004, "type": "channel", "title": "C"}"#)),
            ChatKind::Channel
        );
    }

    #[test]
    fn registers_public_commands() {
        let cmds: Vec<String> = bot_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(cmds, vec!["id".to_string(), "help".to_string()]);
    }
}
