use teloxide::types::{ChatId, MessageId};

use crate::{
    bot_handler::{BotHandler, CallbackAction, GameExitPolicy, Reply, serialize_action},
    classifier::{Callback, TextMessage},
    messaging::MessageRef,
    storage::{ConversationRegistry, ConversationState, Profile},
};

pub const CHAT_ID: ChatId = ChatId(123);
pub const QUERY_ID: &str = "test_callback_id";
pub const MENU_MESSAGE: MessageRef = MessageRef { chat_id: CHAT_ID, message_id: MessageId(7) };

// Test harness wrapping a handler with an isolated registry.
pub struct TestHarness {
    pub handler: BotHandler,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_policy(GameExitPolicy::Terminal)
    }

    pub fn with_policy(game_exit: GameExitPolicy) -> Self {
        Self { handler: BotHandler::new(ConversationRegistry::default(), game_exit) }
    }

    // Simulates a text message from the test chat.
    pub fn send(&mut self, text: &str) -> Vec<Reply> {
        self.handler.handle_message(&mock_message(CHAT_ID, text))
    }

    // Simulates a button press from the test chat.
    pub fn press(&mut self, action: &CallbackAction) -> Vec<Reply> {
        self.press_raw(&serialize_action(action))
    }

    pub fn press_raw(&mut self, payload: &str) -> Vec<Reply> {
        self.handler.handle_callback(&mock_callback(CHAT_ID, payload))
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.handler.registry().get(CHAT_ID)
    }

    pub fn state(&self) -> Option<ConversationState> {
        self.profile().map(|profile| profile.state)
    }
}

pub fn mock_message(chat_id: ChatId, text: &str) -> TextMessage {
    TextMessage { chat_id, text: text.to_string() }
}

pub fn mock_callback(chat_id: ChatId, payload: &str) -> Callback {
    Callback {
        chat_id,
        payload: payload.to_string(),
        query_id: QUERY_ID.to_string(),
        message: MessageRef { chat_id, message_id: MENU_MESSAGE.message_id },
    }
}

// Returns the texts of all `Reply::Text` entries.
pub fn texts_of(replies: &[Reply]) -> Vec<&str> {
    replies
        .iter()
        .filter_map(|reply| match reply {
            Reply::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
