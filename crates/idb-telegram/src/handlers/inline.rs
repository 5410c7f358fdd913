use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{
        ChosenInlineResult, InlineKeyboardButton, InlineKeyboardMarkup, InlineQuery,
        InlineQueryResult, InlineQueryResultArticle, InputMessageContent, InputMessageContentText,
    },
};

use idb_core::{
    inline::{report_inline_message, InlineReport},
    texts,
};

use crate::router::AppState;

/// Telegram only reports `inline_message_id` for results that carry a reply
/// markup, hence the single blank button.
fn inline_markup() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        texts::INLINE_MARKUP,
        texts::INLINE_CALLBACK_DATA,
    )]])
}

pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let article = InlineQueryResultArticle::new(
        q.id.clone(),
        texts::INLINE_TITLE,
        InputMessageContent::Text(InputMessageContentText::new(texts::INLINE_PROCESSING)),
    )
    .reply_markup(inline_markup());

    if let Err(e) = bot
        .answer_inline_query(q.id, vec![InlineQueryResult::Article(article)])
        .cache_time(state.cfg.inline_cache_time)
        .await
    {
        tracing::warn!(error = %e, "answer_inline_query failed");
    }
    Ok(())
}

pub async fn handle_chosen_inline(
    result: ChosenInlineResult,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let Some(token) = result.inline_message_id.as_deref() else {
        tracing::debug!(result_id = %result.result_id, "chosen inline result without inline_message_id");
        return Ok(());
    };

    match report_inline_message(token, state.messenger.as_ref(), state.scores.as_ref()).await {
        Ok(InlineReport::Resolved { id, peer }) => tracing::info!(
            inline_message_id = token,
            dc_id = id.dc_id,
            is_chat = peer.is_chat,
            "inline message resolved"
        ),
        Ok(InlineReport::Undecodable) => {}
        Err(e) => tracing::error!(inline_message_id = token, error = %e, "inline reply failed"),
    }
    Ok(())
}
