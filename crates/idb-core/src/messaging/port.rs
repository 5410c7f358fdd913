use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    Result,
};

/// Outbound messaging port.
///
/// All text is Telegram HTML. Implementations report transport failures as
/// `Error::External`.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef>;

    /// Replace the text of a message sent through inline mode.
    async fn edit_inline_html(&self, inline_message_id: &str, html: &str) -> Result<()>;
}
