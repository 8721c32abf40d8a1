#![warn(missing_docs)]
//! A Telegram bot for a Persian mafia game lobby.
//!
//! The bot long-polls Telegram for updates, keeps a profile per chat and
//! walks each chat through a small dialogue: onboarding, renaming and joining
//! a game.

/// The conversation dispatcher applying events to chat state.
pub mod bot_handler;
/// Splits raw updates into messages and callbacks.
pub mod classifier;
/// The configuration for the application.
pub mod config;
/// The update loop tying polling, dispatch and delivery together.
pub mod dispatcher;
/// The gateway for talking to the Telegram Bot API.
pub mod messaging;
/// The poller for fetching new updates from Telegram.
pub mod poller;
/// The in-memory conversation registry.
pub mod storage;

use std::sync::Arc;

use teloxide::Bot;

use crate::{
    bot_handler::BotHandler,
    config::Config,
    dispatcher::BotDispatcher,
    messaging::{MessagingGateway, TelegramGateway},
    poller::UpdatePoller,
    storage::{CapacityLimit, ConversationRegistry},
};

/// Runs the bot.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let bot = Bot::new(config.telegram_bot_token.clone());
    let gateway: Arc<dyn MessagingGateway> = Arc::new(TelegramGateway::new(bot));

    let registry = match config.max_conversations {
        Some(capacity) => ConversationRegistry::new(Box::new(CapacityLimit::new(capacity))),
        None => ConversationRegistry::default(),
    };
    let handler = BotHandler::new(registry, config.game_exit_policy());
    let poller = UpdatePoller::new(gateway.clone(), config.poll_timeout, config.retry_policy());

    let mut dispatcher = BotDispatcher::new(gateway, poller, handler);
    tracing::debug!("Dispatcher built successfully.");

    dispatcher.run().await?;

    Ok(())
}
