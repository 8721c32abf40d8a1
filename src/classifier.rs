use serde::Deserialize;
use teloxide::types::{ChatId, MessageId};

use crate::messaging::{MessageRef, RawUpdate};

/// A text message sent in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    /// The conversation the text was sent in.
    pub chat_id: ChatId,
    /// The message text, untrimmed.
    pub text: String,
}

/// A press on an inline button of an earlier message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    /// The conversation holding the pressed button.
    pub chat_id: ChatId,
    /// The payload attached to the button.
    pub payload: String,
    /// The query id to answer.
    pub query_id: String,
    /// The message the button belongs to.
    pub message: MessageRef,
}

/// An update the dispatcher knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A text message.
    Message(TextMessage),
    /// A button press.
    Callback(Callback),
}

/// The events of one batch, split by kind. Arrival order is kept within each
/// kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifiedBatch {
    /// Text messages, in arrival order.
    pub messages: Vec<TextMessage>,
    /// Button presses, in arrival order.
    pub callbacks: Vec<Callback>,
}

impl ClassifiedBatch {
    /// Whether the batch holds no event at all.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.callbacks.is_empty()
    }
}

#[derive(Deserialize)]
struct WireChat {
    id: i64,
}

#[derive(Deserialize)]
struct WireMessage {
    message_id: i32,
    chat: WireChat,
    text: Option<String>,
}

#[derive(Deserialize)]
struct WireCallback {
    id: String,
    data: Option<String>,
    message: Option<WireMessage>,
}

/// Determines which kind of event an update is. Anything that is neither a
/// callback nor a message with text yields `None`.
pub fn classify(update: &RawUpdate) -> Option<InboundEvent> {
    if let Some(value) = &update.callback_query {
        let query = WireCallback::deserialize(value).ok()?;
        let message = query.message?;
        let chat_id = ChatId(message.chat.id);

        return Some(InboundEvent::Callback(Callback {
            chat_id,
            payload: query.data?,
            query_id: query.id,
            message: MessageRef { chat_id, message_id: MessageId(message.message_id) },
        }));
    }

    let message = WireMessage::deserialize(update.message.as_ref()?).ok()?;
    Some(InboundEvent::Message(TextMessage {
        chat_id: ChatId(message.chat.id),
        text: message.text?,
    }))
}

/// Classifies every update of a batch and groups the results by kind.
pub fn split_batch(updates: Vec<RawUpdate>) -> ClassifiedBatch {
    updates.iter().filter_map(classify).fold(ClassifiedBatch::default(), |mut batch, event| {
        match event {
            InboundEvent::Message(message) => batch.messages.push(message),
            InboundEvent::Callback(callback) => batch.callbacks.push(callback),
        }
        batch
    })
}
