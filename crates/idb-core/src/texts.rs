//! Reply templates (Telegram HTML).
//!
//! Numeric ids are inserted as-is; anything that can carry user-controlled text
//! goes through `escape_html`.

use crate::{domain::ChatKind, formatting::escape_html, formatting::group_thousands};

pub const HELP: &str = "Use this bot to get ID for different entities across Telegram:\n\
• Forward message from channel to get channel ID;\n\
• Forward message from user to get their ID (unless they restrict from doing so);\n\
• Send a sticker to get its file_id (currently you can use the sticker's file_id with any bot);\n\
• Add bot to group to get its ID (it will even tell you when you migrate from group to supergroup);\n\
• Use inline mode to send your Telegram ID to any chat.";

pub const HIDDEN_FORWARD: &str = "This user decided to <b>hide</b> their ID.\n\n\
Learn more about this feature <a href=\"https://telegram.org/blog/unsend-privacy-emoji#anonymous-forwarding\">here</a>.";

pub const INLINE_TITLE: &str = "Show DC/user/message ID";
pub const INLINE_PROCESSING: &str = "Processing...";
/// Label of the single inline keyboard button (U+2063, renders as blank).
pub const INLINE_MARKUP: &str = "\u{2063}";
pub const INLINE_CALLBACK_DATA: &str = "0";

const RATING_HEADER: &str = "Users' rating by message id:";

pub fn start(user_id: i64, rating: &str) -> String {
    format!("Your ID is <code>{user_id}</code>\n\n{rating}\n\nHelp: /help")
}

pub fn private_id(user_id: i64) -> String {
    format!("Your Telegram ID is <code>{user_id}</code>")
}

pub fn chat_id(kind: ChatKind, chat_id: i64) -> String {
    format!("This {kind} chat ID is <code>{chat_id}</code>")
}

pub fn forwarded_channel(chat_id: i64) -> String {
    format!("This channel's ID is <code>{chat_id}</code>")
}

pub fn forwarded_bot(user_id: u64) -> String {
    format!("This bot's ID is <code>{user_id}</code>")
}

pub fn forwarded_user(user_id: u64) -> String {
    format!("This user's ID is <code>{user_id}</code>")
}

/// Suffix appended when the message carries a sticker.
pub fn sticker_suffix(file_id: &str) -> String {
    format!(
        "\nAlso this sticker's ID is <code>{}</code>",
        escape_html(file_id)
    )
}

pub fn migrated(old_chat_id: i64, new_chat_id: i64) -> String {
    format!(
        "Group upgraded to supergroup.\nOld ID: <code>{old_chat_id}</code>\nNew ID: <code>{new_chat_id}</code>"
    )
}

pub fn inline_process_error(inline_message_id: &str) -> String {
    format!(
        "Error with your request - {}",
        escape_html(inline_message_id)
    )
}

pub fn inline_user(dc_id: i32, user_id: u64, message_id: i32) -> String {
    format!(
        "DC ID: <code>{dc_id}</code>\nUser ID: <code>{user_id}</code>\nMessage ID: <code>{}</code>",
        group_thousands(i64::from(message_id))
    )
}

pub fn inline_chat(dc_id: i32, chat_id: u64, message_id: i32) -> String {
    format!(
        "DC ID: <code>{dc_id}</code>\nChat ID: <code>{chat_id}</code>\nMessage ID: <code>{}</code> (<a href=\"https://t.me/c/{chat_id}/{message_id}\">link</a>)",
        group_thousands(i64::from(message_id))
    )
}

pub fn rating<I>(records: I) -> String
where
    I: IntoIterator<Item = (i64, Option<i64>)>,
{
    let mut out = String::from(RATING_HEADER);
    out.push('\n');
    let lines: Vec<String> = records
        .into_iter()
        .map(|(user_id, score)| {
            let score = score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
            format!("<code>{user_id}</code> — <i>{score}</i>")
        })
        .collect();
    out.push_str(&lines.join("\n"));
    out
}
