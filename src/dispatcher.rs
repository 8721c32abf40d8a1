use std::sync::Arc;

use crate::{
    bot_handler::{BotHandler, Reply},
    classifier,
    messaging::{self, MessagingGateway},
    poller::{PollerError, UpdatePoller},
};

/// Runs the poll, classify, dispatch and deliver cycle.
pub struct BotDispatcher {
    gateway: Arc<dyn MessagingGateway>,
    poller: UpdatePoller,
    handler: BotHandler,
}

impl BotDispatcher {
    /// Creates a new `BotDispatcher`.
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        poller: UpdatePoller,
        handler: BotHandler,
    ) -> Self {
        Self { gateway, poller, handler }
    }

    /// The handler owning conversation state.
    pub fn handler(&self) -> &BotHandler {
        &self.handler
    }

    /// The poller owning the update cursor.
    pub fn poller(&self) -> &UpdatePoller {
        &self.poller
    }

    /// Runs cycles until the process is stopped or fetching keeps failing
    /// beyond the retry policy.
    pub async fn run(&mut self) -> Result<(), PollerError> {
        tracing::debug!("Starting update loop");

        loop {
            self.run_cycle().await;
            let delay = self.poller.next_delay()?;
            tokio::time::sleep(delay).await;
        }
    }

    /// Runs one cycle to completion.
    pub async fn run_cycle(&mut self) {
        let updates = self.poller.fetch_batch().await;
        if updates.is_empty() {
            return;
        }

        let batch = classifier::split_batch(updates);
        tracing::debug!(
            "Dispatching {} messages and {} callbacks",
            batch.messages.len(),
            batch.callbacks.len()
        );

        for reply in self.handler.handle_batch(&batch) {
            if let Err(e) = self.deliver(&reply).await {
                tracing::warn!("Failed to deliver {reply:?}: {e}");
            }
        }
    }

    async fn deliver(&self, reply: &Reply) -> messaging::Result<()> {
        match reply {
            Reply::Text { chat_id, text } => self.gateway.send_text(*chat_id, text).await,
            Reply::Choice { chat_id, text, buttons } => {
                self.gateway.send_choice(*chat_id, text, buttons).await
            }
            Reply::Acknowledge { query_id, text } => self.gateway.acknowledge(query_id, text).await,
            Reply::EditText { message, text } => self.gateway.edit_text(*message, text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::{Sequence, predicate::*};
    use serde_json::json;
    use teloxide::types::{ChatId, MessageId};

    use super::*;
    use crate::{
        bot_handler::{CallbackAction, GameExitPolicy, serialize_action},
        messaging::{
            MessageRef, MessagingError, MockMessagingGateway, RawUpdate, profile_buttons, texts,
        },
        poller::RetryPolicy,
        storage::{ConversationRegistry, ConversationState},
    };

    const CHAT_ID: ChatId = ChatId(123);
    const POLL_TIMEOUT: u32 = 10;

    fn text_update(update_id: u64, chat_id: ChatId, text: &str) -> RawUpdate {
        RawUpdate {
            message: Some(json!({
                "message_id": update_id,
                "date": 0,
                "chat": { "id": chat_id.0, "type": "private" },
                "text": text
            })),
            ..RawUpdate::bare(update_id)
        }
    }

    fn callback_update(update_id: u64, chat_id: ChatId, action: &CallbackAction) -> RawUpdate {
        RawUpdate {
            callback_query: Some(json!({
                "id": format!("query-{update_id}"),
                "data": serialize_action(action),
                "message": { "message_id": 77, "chat": { "id": chat_id.0 } }
            })),
            ..RawUpdate::bare(update_id)
        }
    }

    fn retry_policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            poll_interval: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            max_attempts,
        }
    }

    fn build_dispatcher(mock_gateway: MockMessagingGateway) -> BotDispatcher {
        let gateway: Arc<dyn MessagingGateway> = Arc::new(mock_gateway);
        let poller = UpdatePoller::new(gateway.clone(), POLL_TIMEOUT, retry_policy(None));
        let handler = BotHandler::new(ConversationRegistry::default(), GameExitPolicy::Terminal);
        BotDispatcher::new(gateway, poller, handler)
    }

    #[tokio::test]
    async fn test_run_cycle_start_message() {
        // Arrange
        let mut mock_gateway = MockMessagingGateway::new();
        mock_gateway
            .expect_fetch_updates()
            .with(eq(0), eq(POLL_TIMEOUT))
            .times(1)
            .returning(|_, _| Ok(vec![text_update(41, CHAT_ID, "/start")]));
        mock_gateway
            .expect_send_text()
            .with(eq(CHAT_ID), eq(texts::ONBOARDING))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut dispatcher = build_dispatcher(mock_gateway);

        // Act
        dispatcher.run_cycle().await;

        // Assert
        assert_eq!(dispatcher.poller().cursor().last_seen(), Some(41));
        assert!(dispatcher.handler().registry().contains(CHAT_ID));
    }

    #[tokio::test]
    async fn test_run_cycle_unclassified_events_only_move_cursor() {
        let mut mock_gateway = MockMessagingGateway::new();
        let mut seq = Sequence::new();
        mock_gateway
            .expect_fetch_updates()
            .with(eq(0), always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![RawUpdate::bare(12), RawUpdate::bare(15)]));
        mock_gateway
            .expect_fetch_updates()
            .with(eq(16), always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Vec::new()));
        // No send expectations: any outbound call would fail the test.

        let mut dispatcher = build_dispatcher(mock_gateway);

        dispatcher.run_cycle().await;
        dispatcher.run_cycle().await;

        assert_eq!(dispatcher.poller().cursor().last_seen(), Some(15));
        assert!(dispatcher.handler().registry().is_empty());
    }

    #[tokio::test]
    async fn test_run_cycle_delivery_failure_does_not_abort_batch() {
        let other = ChatId(456);
        let mut mock_gateway = MockMessagingGateway::new();
        mock_gateway.expect_fetch_updates().times(1).returning(move |_, _| {
            Ok(vec![text_update(1, CHAT_ID, "/start"), text_update(2, other, "/start")])
        });
        mock_gateway
            .expect_send_text()
            .with(eq(CHAT_ID), always())
            .times(1)
            .returning(|_, _| Err(MessagingError::Rejected("Forbidden".to_string())));
        mock_gateway
            .expect_send_text()
            .with(eq(other), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut dispatcher = build_dispatcher(mock_gateway);

        dispatcher.run_cycle().await;

        assert!(dispatcher.handler().registry().contains(CHAT_ID));
        assert!(dispatcher.handler().registry().contains(other));
    }

    #[tokio::test]
    async fn test_run_cycle_messages_before_callbacks() {
        let mut mock_gateway = MockMessagingGateway::new();
        let mut seq = Sequence::new();
        mock_gateway.expect_fetch_updates().times(1).returning(|_, _| {
            Ok(vec![
                callback_update(3, CHAT_ID, &CallbackAction::ChangeName),
                text_update(4, CHAT_ID, "/start"),
            ])
        });
        mock_gateway
            .expect_send_text()
            .with(eq(CHAT_ID), eq(texts::ONBOARDING))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mock_gateway
            .expect_send_text()
            .with(eq(CHAT_ID), eq(texts::RENAME_PROMPT))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mock_gateway
            .expect_acknowledge()
            .with(eq("query-3"), eq(texts::RENAME_ACK))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut dispatcher = build_dispatcher(mock_gateway);

        dispatcher.run_cycle().await;

        let state = dispatcher.handler().registry().get(CHAT_ID).map(|p| p.state);
        assert_eq!(state, Some(ConversationState::AwaitingName));
    }

    #[tokio::test]
    async fn test_run_cycle_profile_and_settings() {
        let mut mock_gateway = MockMessagingGateway::new();
        let mut seq = Sequence::new();
        mock_gateway
            .expect_fetch_updates()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(vec![text_update(1, CHAT_ID, "/start"), text_update(2, CHAT_ID, "/profile")])
            });
        mock_gateway
            .expect_fetch_updates()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(vec![callback_update(3, CHAT_ID, &CallbackAction::Settings)]));
        mock_gateway.expect_send_text().times(1).returning(|_, _| Ok(()));
        mock_gateway
            .expect_send_choice()
            .withf(|chat_id, text, buttons| {
                *chat_id == CHAT_ID
                    && text.contains(&CHAT_ID.to_string())
                    && buttons == profile_buttons().as_slice()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock_gateway
            .expect_edit_text()
            .with(
                eq(MessageRef { chat_id: CHAT_ID, message_id: MessageId(77) }),
                eq(texts::SETTINGS_VIEW),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        mock_gateway
            .expect_acknowledge()
            .with(eq("query-3"), eq(texts::SETTINGS_ACK))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut dispatcher = build_dispatcher(mock_gateway);

        dispatcher.run_cycle().await;
        dispatcher.run_cycle().await;

        assert_eq!(dispatcher.poller().cursor().last_seen(), Some(3));
    }

    #[tokio::test]
    async fn test_run_stops_when_retries_exhausted() {
        let mut mock_gateway = MockMessagingGateway::new();
        mock_gateway
            .expect_fetch_updates()
            .times(3)
            .returning(|_, _| Err(MessagingError::Rejected("Unauthorized".to_string())));

        let gateway: Arc<dyn MessagingGateway> = Arc::new(mock_gateway);
        let poller = UpdatePoller::new(gateway.clone(), POLL_TIMEOUT, retry_policy(Some(3)));
        let handler = BotHandler::new(ConversationRegistry::default(), GameExitPolicy::Terminal);
        let mut dispatcher = BotDispatcher::new(gateway, poller, handler);

        let result = dispatcher.run().await;

        assert!(matches!(result, Err(PollerError::RetriesExhausted(3))));
    }
}
