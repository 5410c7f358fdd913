use teloxide::prelude::*;

/// The only button the bot attaches is the blank one on inline results; it
/// carries no action, so the query is just acknowledged.
pub async fn handle_callback(bot: Bot, q: CallbackQuery) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(q.id).await {
        tracing::debug!(error = %e, "answer_callback_query failed");
    }
    Ok(())
}
