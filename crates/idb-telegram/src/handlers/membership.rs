use std::sync::Arc;

use teloxide::{prelude::*, types::ChatMemberUpdated};

use idb_core::{domain::ChatId, replies};

use crate::router::{chat_kind, AppState};

/// The bot itself was added to a group or supergroup.
fn is_group_join(upd: &ChatMemberUpdated) -> bool {
    (upd.chat.is_group() || upd.chat.is_supergroup())
        && !upd.old_chat_member.kind.is_present()
        && upd.new_chat_member.kind.is_present()
}

pub async fn handle_my_chat_member(
    upd: ChatMemberUpdated,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    if !is_group_join(&upd) {
        return Ok(());
    }

    let chat_id = ChatId(upd.chat.id.0);
    let html = replies::group_join(chat_kind(&upd.chat), chat_id);
    if let Err(e) = state.messenger.send_html(chat_id, &html).await {
        tracing::warn!(chat_id = chat_id.0, error = %e, "group join announcement failed");
    }
    Ok(())
}
