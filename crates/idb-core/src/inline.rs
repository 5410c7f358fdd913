//! Handling of a chosen inline result: decode its inline message id, report
//! the ids back into the message and feed the score store.

use crate::{
    domain::UserId,
    inline_id::{InlineMessageId, PeerRef},
    messaging::port::MessagingPort,
    scores::{submit_score, ScoreStore},
    texts, Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineReport {
    /// Ids were decoded and written into the message.
    Resolved { id: InlineMessageId, peer: PeerRef },
    /// The token did not decode; the message shows the error text.
    Undecodable,
}

/// Render the reply for a decoded id.
pub fn render_report(id: &InlineMessageId) -> String {
    let peer = id.peer();
    if peer.is_chat {
        texts::inline_chat(id.dc_id, peer.id, id.message_id)
    } else {
        texts::inline_user(id.dc_id, peer.id, id.message_id)
    }
}

/// Decode `inline_message_id`, edit the inline message with the result and
/// record the message id as the user's score.
///
/// The score goes to the decoded peer when it is a user, not to whoever chose
/// the result; chat peers are never scored.
///
/// A token that does not decode is terminal: the message is switched to the
/// error text and `Undecodable` is returned. Transport errors only surface if
/// even the error text cannot be written.
pub async fn report_inline_message(
    inline_message_id: &str,
    messenger: &dyn MessagingPort,
    scores: &dyn ScoreStore,
) -> Result<InlineReport> {
    let id = match InlineMessageId::decode(inline_message_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(inline_message_id, error = %e, "resolving error");
            messenger
                .edit_inline_html(
                    inline_message_id,
                    &texts::inline_process_error(inline_message_id),
                )
                .await?;
            return Ok(InlineReport::Undecodable);
        }
    };
    let peer = id.peer();

    if !peer.is_chat {
        match submit_score(scores, UserId(id.peer_id), i64::from(id.message_id)).await {
            Ok(true) => {
                tracing::debug!(user_id = id.peer_id, score = id.message_id, "score raised")
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(inline_message_id, error = %e, "score update failed"),
        }
    }

    if let Err(e) = messenger
        .edit_inline_html(inline_message_id, &render_report(&id))
        .await
    {
        tracing::error!(inline_message_id, error = %e, "resolving error (2)");
        messenger
            .edit_inline_html(
                inline_message_id,
                &texts::inline_process_error(inline_message_id),
            )
            .await?;
    }

    Ok(InlineReport::Resolved { id, peer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, MessageId, MessageRef},
        errors::Error,
        scores::{MemoryScoreStore, ScoreRecord},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeMessenger {
        edits: Mutex<Vec<(String, String)>>,
        fail_edits: Mutex<usize>,
    }

    impl FakeMessenger {
        fn failing_first(n: usize) -> Self {
            let m = Self::default();
            *m.fail_edits.lock().unwrap() = n;
            m
        }

        fn edits(&self) -> Vec<(String, String)> {
            self.edits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        async fn send_html(&self, chat_id: ChatId, _html: &str) -> Result<MessageRef> {
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn reply_html(&self, to: MessageRef, _html: &str) -> Result<MessageRef> {
            Ok(to)
        }

        async fn edit_inline_html(&self, inline_message_id: &str, html: &str) -> Result<()> {
            {
                let mut fails = self.fail_edits.lock().unwrap();
                if *fails > 0 {
                    *fails -= 1;
                    return Err(Error::External("telegram error: message is not modified".into()));
                }
            }
            self.edits
                .lock()
                .unwrap()
                .push((inline_message_id.to_string(), html.to_string()));
            Ok(())
        }
    }

    /// Store that rejects every call.
    struct BrokenStore;

    #[async_trait]
    impl ScoreStore for BrokenStore {
        async fn find_by_user_id(&self, _user_id: UserId) -> Result<Option<ScoreRecord>> {
            Err(Error::External("store unavailable".into()))
        }

        async fn save(&self, _record: ScoreRecord) -> Result<()> {
            Err(Error::External("store unavailable".into()))
        }

        async fn save_if_higher(&self, _user_id: UserId, _score: i64) -> Result<bool> {
            Err(Error::External("store unavailable".into()))
        }

        async fn list_sorted_by_score_desc(&self) -> Result<Vec<ScoreRecord>> {
            Err(Error::External("store unavailable".into()))
        }
    }

    const USER_TOKEN: &str = "AgAAAIfWEgCxaN46AFL9fVwszqo";
    const CHAT_TOKEN: &str = "BAAAAC7txOEW____KgAAAAAAAAAAAABw";

    #[tokio::test]
    async fn user_peer_gets_report_and_score() {
        let messenger = FakeMessenger::default();
        let scores = MemoryScoreStore::new();

        let report = report_inline_message(USER_TOKEN, &messenger, &scores)
            .await
            .unwrap();
        assert!(matches!(
            report,
            InlineReport::Resolved {
                peer: PeerRef { is_chat: false, id: 987_654_321 },
                ..
            }
        ));

        let edits = messenger.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, USER_TOKEN);
        assert!(edits[0].1.contains("User ID: <code>987654321</code>"));
        assert!(edits[0].1.contains("Message ID: <code>1,234,567</code>"));

        let rec = scores
            .find_by_user_id(UserId(987_654_321))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rec.score, Some(1_234_567));
    }

    #[tokio::test]
    async fn chat_peer_gets_link_and_no_score() {
        let messenger = FakeMessenger::default();
        let scores = MemoryScoreStore::new();

        report_inline_message(CHAT_TOKEN, &messenger, &scores)
            .await
            .unwrap();

        let edits = messenger.edits();
        assert!(edits[0].1.contains("Chat ID: <code>1001234567890</code>"));
        assert!(edits[0].1.contains("https://t.me/c/1001234567890/42"));
        assert!(scores.list_sorted_by_score_desc().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn undecodable_token_shows_error_text() {
        let messenger = FakeMessenger::default();
        let scores = MemoryScoreStore::new();

        let report = report_inline_message("not*base64", &messenger, &scores)
            .await
            .unwrap();
        assert_eq!(report, InlineReport::Undecodable);
        assert_eq!(
            messenger.edits(),
            vec![(
                "not*base64".to_string(),
                "Error with your request - not*base64".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn failed_edit_falls_back_to_error_text() {
        let messenger = FakeMessenger::failing_first(1);
        let scores = MemoryScoreStore::new();

        let report = report_inline_message(USER_TOKEN, &messenger, &scores)
            .await
            .unwrap();
        assert!(matches!(report, InlineReport::Resolved { .. }));

        let edits = messenger.edits();
        assert_eq!(edits.len(), 1);
        assert!(edits[0].1.starts_with("Error with your request"));
    }

    #[tokio::test]
    async fn store_failure_still_edits_the_report() {
        let messenger = FakeMessenger::default();

        let report = report_inline_message(USER_TOKEN, &messenger, &BrokenStore)
            .await
            .unwrap();
        assert!(matches!(
            report,
            InlineReport::Resolved {
                peer: PeerRef { is_chat: false, .. },
                ..
            }
        ));

        let edits = messenger.edits();
        assert_eq!(edits.len(), 1);
        assert!(edits[0].1.contains("User ID: <code>987654321</code>"));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_external_error() {
        let messenger = FakeMessenger::failing_first(2);
        let scores = MemoryScoreStore::new();

        let err = report_inline_message(USER_TOKEN, &messenger, &scores)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::External(_)));
        assert!(messenger.edits().is_empty());
    }
}
