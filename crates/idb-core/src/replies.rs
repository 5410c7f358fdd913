//! Which reply, if any, an incoming message gets.
//!
//! Precedence: commands, forwards, group migration, then the private-chat
//! fallback. Group messages that match none of these are ignored.

use crate::{
    domain::{ChatId, ChatKind},
    messaging::types::{ForwardOrigin, IncomingMessage, Outgoing},
    rating::RatingBoard,
    texts,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Id,
    Help,
}

/// Parse `/cmd`, `/cmd@botname` or `/cmd args`. Unknown commands yield `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim().split_whitespace().next()?;
    let name = first.strip_prefix('/')?.split('@').next().unwrap_or("");
    match name.to_lowercase().as_str() {
        "start" => Some(Command::Start),
        "id" => Some(Command::Id),
        "help" => Some(Command::Help),
        _ => None,
    }
}

pub async fn respond(msg: &IncomingMessage, rating: &RatingBoard) -> Option<Outgoing> {
    let is_private = msg.chat_kind == ChatKind::Private;

    if let Some(cmd) = msg.text.as_deref().and_then(parse_command) {
        match cmd {
            Command::Start if is_private => {
                let rating = rating.current_snapshot().await;
                return Some(Outgoing::Send(texts::start(msg.msg.chat_id.0, &rating)));
            }
            Command::Start => {}
            Command::Id => return Some(Outgoing::Send(id_text(msg))),
            Command::Help => return Some(Outgoing::Send(texts::HELP.to_string())),
        }
    }

    if let Some(origin) = &msg.forward {
        let mut text = match origin {
            ForwardOrigin::Channel { chat_id } => texts::forwarded_channel(chat_id.0),
            ForwardOrigin::User {
                user_id,
                is_bot: true,
            } => texts::forwarded_bot(*user_id),
            ForwardOrigin::User { user_id, .. } => texts::forwarded_user(*user_id),
            ForwardOrigin::Hidden => texts::HIDDEN_FORWARD.to_string(),
        };
        append_sticker(&mut text, msg);
        return Some(Outgoing::Reply(text));
    }

    if let Some(new_chat) = msg.migrate_to_chat_id {
        return Some(Outgoing::SendTo(
            new_chat,
            texts::migrated(msg.msg.chat_id.0, new_chat.0),
        ));
    }

    if is_private {
        let mut text = texts::private_id(msg.msg.chat_id.0);
        append_sticker(&mut text, msg);
        return Some(Outgoing::Reply(text));
    }

    None
}

/// Announcement when the bot is added to a group.
pub fn group_join(kind: ChatKind, chat_id: ChatId) -> String {
    texts::chat_id(kind, chat_id.0)
}

fn id_text(msg: &IncomingMessage) -> String {
    match msg.from {
        Some(user) if user.0 == msg.msg.chat_id.0 => texts::private_id(user.0),
        _ => texts::chat_id(msg.chat_kind, msg.msg.chat_id.0),
    }
}

fn append_sticker(text: &mut String, msg: &IncomingMessage) {
    if let Some(file_id) = &msg.sticker_file_id {
        text.push_str(&texts::sticker_suffix(file_id));
    }
}
