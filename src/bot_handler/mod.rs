mod callback_actions;
mod callbacks;
mod commands;
mod name_policy;
#[cfg(test)]
mod test_helpers;

pub use callback_actions::{CallbackAction, parse_action, serialize_action};
pub use commands::Command;
pub use name_policy::{MAX_NAME_LEN, MIN_NAME_LEN, NameError, validate_name};
use teloxide::{types::ChatId, utils::command::BotCommands};

use crate::{
    classifier::{Callback, ClassifiedBatch, TextMessage},
    messaging::{ChoiceButton, MessageRef, texts},
    storage::{ConversationRegistry, ConversationState},
};

/// An outbound call produced while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A plain text message.
    Text {
        /// The receiving chat.
        chat_id: ChatId,
        /// The message body.
        text: String,
    },
    /// A text message with one row of inline buttons.
    Choice {
        /// The receiving chat.
        chat_id: ChatId,
        /// The message body.
        text: String,
        /// The buttons, left to right.
        buttons: Vec<ChoiceButton>,
    },
    /// The answer to a button press.
    Acknowledge {
        /// The callback query being answered.
        query_id: String,
        /// A short notice shown by the client.
        text: String,
    },
    /// A replacement text for an earlier message.
    EditText {
        /// The message to edit.
        message: MessageRef,
        /// The new body.
        text: String,
    },
}

impl Reply {
    /// Shorthand for [`Reply::Text`].
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Reply::Text { chat_id, text: text.into() }
    }

    /// Shorthand for [`Reply::Acknowledge`].
    pub fn acknowledge(query_id: impl Into<String>, text: impl Into<String>) -> Self {
        Reply::Acknowledge { query_id: query_id.into(), text: text.into() }
    }
}

/// Whether a conversation can leave the `InGame` state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameExitPolicy {
    /// Once in a game, a conversation stays there.
    #[default]
    Terminal,
    /// `/leavegame` returns the conversation to `Idle`.
    LeaveCommand,
}

/// Groups the data needed by command and callback handlers.
pub struct Context<'a> {
    /// The registry the handler mutates.
    pub registry: &'a mut ConversationRegistry,
    /// The chat the event came from.
    pub chat_id: ChatId,
}

/// Applies inbound events to the conversation registry.
pub struct BotHandler {
    registry: ConversationRegistry,
    game_exit: GameExitPolicy,
}

impl BotHandler {
    /// Creates a new `BotHandler` owning `registry`.
    pub fn new(registry: ConversationRegistry, game_exit: GameExitPolicy) -> Self {
        Self { registry, game_exit }
    }

    /// Read access to the conversation registry.
    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    fn context(&mut self, chat_id: ChatId) -> Context<'_> {
        Context { registry: &mut self.registry, chat_id }
    }

    /// Handles every message of the batch, then every callback, in arrival
    /// order. Replies are returned in the order they must be sent.
    pub fn handle_batch(&mut self, batch: &ClassifiedBatch) -> Vec<Reply> {
        let mut replies = Vec::new();
        for message in &batch.messages {
            replies.extend(self.handle_message(message));
        }
        for callback in &batch.callbacks {
            replies.extend(self.handle_callback(callback));
        }
        replies
    }

    /// Handles a text message.
    pub fn handle_message(&mut self, message: &TextMessage) -> Vec<Reply> {
        let chat_id = message.chat_id;
        let state = self.registry.get(chat_id).map(|profile| profile.state);

        if state == Some(ConversationState::AwaitingName) {
            tracing::debug!("Treating message from chat {chat_id} as a new name");
            return commands::rename::handle_reply(self.context(chat_id), &message.text);
        }

        match self.parse_command(&message.text) {
            Some(command) => {
                tracing::debug!("Handling {command:?} for chat: {chat_id}");
                command.handle(self.context(chat_id))
            }
            None => commands::fallback::handle(self.context(chat_id), &message.text),
        }
    }

    /// Handles a button press.
    pub fn handle_callback(&mut self, callback: &Callback) -> Vec<Reply> {
        let chat_id = callback.chat_id;

        match parse_action(&callback.payload) {
            Some(CallbackAction::ChangeName) => {
                callbacks::change_name::handle(self.context(chat_id), callback)
            }
            Some(CallbackAction::Settings) => callbacks::settings::handle(callback),
            None => {
                tracing::debug!(
                    "Unsupported callback payload {:?} from chat {chat_id}",
                    callback.payload
                );
                vec![Reply::acknowledge(&callback.query_id, texts::UNSUPPORTED_ACTION)]
            }
        }
    }

    // Trailing arguments are accepted by `BotCommands`, so only a text equal
    // to the bare command counts.
    fn parse_command(&self, text: &str) -> Option<Command> {
        match Command::parse(text, "").ok()? {
            command if command.literal() != text => None,
            Command::LeaveGame if self.game_exit == GameExitPolicy::Terminal => None,
            command => Some(command),
        }
    }
}
