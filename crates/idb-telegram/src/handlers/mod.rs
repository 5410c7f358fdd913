//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - converts the teloxide update into `idb-core` types
//! - asks the core what to do
//! - sends the result through the `MessagingPort`

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatMemberUpdated, ChosenInlineResult, InlineQuery, Message},
};

use crate::router::AppState;

mod callback;
mod inline;
mod membership;
mod messages;

pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    inline::handle_inline_query(bot, q, state).await
}

pub async fn handle_chosen_inline(
    result: ChosenInlineResult,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    inline::handle_chosen_inline(result, state).await
}

pub async fn handle_callback(bot: Bot, q: CallbackQuery) -> ResponseResult<()> {
    callback::handle_callback(bot, q).await
}

pub async fn handle_my_chat_member(
    upd: ChatMemberUpdated,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    membership::handle_my_chat_member(upd, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    messages::handle_message(msg, state).await
}
