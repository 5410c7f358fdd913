use std::sync::Arc;

use teloxide::prelude::*;

use idb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{ForwardOrigin, IncomingMessage, Outgoing},
    replies,
};

use crate::router::{chat_kind, AppState};

fn to_incoming(msg: &Message) -> IncomingMessage {
    let mut incoming = IncomingMessage::new(
        MessageRef {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
        },
        chat_kind(&msg.chat),
    );

    incoming.from = msg.from().map(|u| UserId(u.id.0 as i64));
    incoming.text = msg.text().map(|s| s.to_string());
    incoming.sticker_file_id = msg.sticker().map(|s| s.file.id.clone());
    incoming.migrate_to_chat_id = msg.migrate_to_chat_id().map(|c| ChatId(c.0));

    incoming.forward = if let Some(chat) = msg.forward_from_chat() {
        Some(ForwardOrigin::Channel {
            chat_id: ChatId(chat.id.0),
        })
    } else if let Some(user) = msg.forward_from_user() {
        Some(ForwardOrigin::User {
            user_id: user.id.0,
            is_bot: user.is_bot,
        })
    } else if msg.forward_from_sender_name().is_some() {
        Some(ForwardOrigin::Hidden)
    } else {
        None
    };

    incoming
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let incoming = to_incoming(&msg);
    let Some(out) = replies::respond(&incoming, &state.rating).await else {
        return Ok(());
    };

    let chat_id = incoming.msg.chat_id;
    let res = match out {
        Outgoing::Send(html) => state.messenger.send_html(chat_id, &html).await,
        Outgoing::Reply(html) => state.messenger.reply_html(incoming.msg, &html).await,
        Outgoing::SendTo(target, html) => state.messenger.send_html(target, &html).await,
    };
    if let Err(e) = res {
        tracing::warn!(chat_id = chat_id.0, error = %e, "reply failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idb_core::domain::ChatKind;

    fn message(json: serde_json::Value) -> Message {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn converts_private_text_message() {
        let msg = message(serde_json::json!({
            "message_id": 12,
            "date": 1700000000,
            "chat": {"id": 5, "type": "private", "first_name": "Ann"},
            "from": {"id": 5, "is_bot": false, "first_name": "Ann"},
            "text": "/id"
        }));

        let inc = to_incoming(&msg);
        assert_eq!(inc.msg.chat_id, ChatId(5));
        assert_eq!(inc.msg.message_id, MessageId(12));
        assert_eq!(inc.chat_kind, ChatKind::Private);
        assert_eq!(inc.from, Some(UserId(5)));
        assert_eq!(inc.text.as_deref(), Some("/id"));
        assert!(inc.forward.is_none());
    }

    #[test]
    fn converts_forward_from_user() {
        let msg = message(serde_json::json!({
            "message_id": 13,
            "date": 1700000000,
            "chat": {"id": 5, "type": "private", "first_name": "Ann"},
            "from": {"id": 5, "is_bot": false, "first_name": "Ann"},
            "forward_from": {"id": 93372553, "is_bot": true, "first_name": "Bot"},
            "forward_date": 1690000000,
            "text": "hi"
        }));

        assert_eq!(
            to_incoming(&msg).forward,
            Some(ForwardOrigin::User {
                user_id: 93372553,
                is_bot: true
            })
        );
    }
}
