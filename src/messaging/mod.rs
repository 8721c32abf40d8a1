mod keyboards;
pub mod texts;

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use teloxide::{
    prelude::*,
    types::{ChatId, MessageId},
};
use thiserror::Error;
use url::Url;

pub use keyboards::{ChoiceButton, build_choice_keyboard, profile_buttons};

/// Failures talking to the Bot API.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The HTTP exchange itself failed.
    #[error("Telegram request did not complete: {0}")]
    Transport(#[from] reqwest::Error),
    /// An outbound teloxide request failed.
    #[error("Teloxide API request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    /// The API answered with `ok: false`.
    #[error("Telegram rejected the request: {0}")]
    Rejected(String),
    /// The response body could not be decoded.
    #[error("Malformed Telegram response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    /// The endpoint URL could not be built.
    #[error("Invalid Telegram API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl MessagingError {
    /// Whether the response arrived but could not be interpreted.
    pub fn is_malformed(&self) -> bool {
        matches!(self, MessagingError::MalformedResponse(_))
    }
}

/// Result type for gateway calls.
pub type Result<T> = std::result::Result<T, MessagingError>;

/// One event as delivered by `getUpdates`. The optional sub-fields are kept
/// undecoded so the classifier can decide what they mean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawUpdate {
    /// The sequence number used for the poll offset.
    pub update_id: u64,
    /// The `message` object, if present.
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    /// The `callback_query` object, if present.
    #[serde(default)]
    pub callback_query: Option<serde_json::Value>,
}

impl RawUpdate {
    /// An update carrying nothing but its sequence number.
    pub fn bare(update_id: u64) -> Self {
        Self { update_id, message: None, callback_query: None }
    }
}

/// Points at a message previously sent to a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    /// The chat holding the message.
    pub chat_id: ChatId,
    /// The message within that chat.
    pub message_id: MessageId,
}

/// Request/response exchange with the remote chat API.
#[automock]
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Long-polls for events with a sequence number of at least `offset`.
    async fn fetch_updates(&self, offset: u64, timeout: u32) -> Result<Vec<RawUpdate>>;

    /// Sends a plain text message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Sends a text message with a single row of inline buttons.
    async fn send_choice(
        &self,
        chat_id: ChatId,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<()>;

    /// Answers a callback query so the client stops showing a spinner.
    async fn acknowledge(&self, query_id: &str, text: &str) -> Result<()>;

    /// Replaces the text of an earlier message in place.
    async fn edit_text(&self, message: MessageRef, text: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Decodes a `getUpdates` response body.
pub fn decode_updates(body: &str) -> Result<Vec<RawUpdate>> {
    let response: ApiResponse<Vec<RawUpdate>> = serde_json::from_str(body)?;

    if !response.ok {
        return Err(MessagingError::Rejected(
            response.description.unwrap_or_else(|| "no description".to_string()),
        ));
    }

    Ok(response.result.unwrap_or_default())
}

/// Telegram messaging gateway.
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    /// Wraps a teloxide `Bot`.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn updates_url(&self) -> Result<Url> {
        Ok(self.bot.api_url().join(&format!("bot{}/getUpdates", self.bot.token()))?)
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn fetch_updates(&self, offset: u64, timeout: u32) -> Result<Vec<RawUpdate>> {
        let body = self
            .bot
            .client()
            .get(self.updates_url()?)
            .query(&[("offset", offset), ("timeout", u64::from(timeout))])
            .send()
            .await?
            .text()
            .await?;

        decode_updates(&body)
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(chat_id, text)
            .await
            .map(|_| ())
            .map_err(MessagingError::Request)
    }

    async fn send_choice(
        &self,
        chat_id: ChatId,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<()> {
        self.bot
            .send_message(chat_id, text)
            .reply_markup(build_choice_keyboard(buttons))
            .await
            .map(|_| ())
            .map_err(MessagingError::Request)
    }

    async fn acknowledge(&self, query_id: &str, text: &str) -> Result<()> {
        self.bot
            .answer_callback_query(query_id.to_string())
            .text(text)
            .show_alert(false)
            .await
            .map(|_| ())
            .map_err(MessagingError::Request)
    }

    async fn edit_text(&self, message: MessageRef, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(message.chat_id, message.message_id, text)
            .await
            .map(|_| ())
            .map_err(MessagingError::Request)
    }
}
