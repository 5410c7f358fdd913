use crate::domain::{ChatId, ChatKind, MessageRef, UserId};

/// Messenger-agnostic view of an incoming message, reduced to what the bot
/// replies about.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub msg: MessageRef,
    pub chat_kind: ChatKind,
    pub from: Option<UserId>,
    pub text: Option<String>,
    pub forward: Option<ForwardOrigin>,
    pub sticker_file_id: Option<String>,
    /// Set on the service message a group leaves behind when it becomes a supergroup.
    pub migrate_to_chat_id: Option<ChatId>,
}

impl IncomingMessage {
    pub fn new(msg: MessageRef, chat_kind: ChatKind) -> Self {
        Self {
            msg,
            chat_kind,
            from: None,
            text: None,
            forward: None,
            sticker_file_id: None,
            migrate_to_chat_id: None,
        }
    }
}

/// Where a forwarded message came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardOrigin {
    Channel { chat_id: ChatId },
    User { user_id: u64, is_bot: bool },
    /// The sender restricts linking forwards to their account.
    Hidden,
}

/// What to send in response to an incoming message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outgoing {
    /// Plain message into the same chat.
    Send(String),
    /// Reply quoting the incoming message.
    Reply(String),
    /// Message into another chat.
    SendTo(ChatId, String),
}
