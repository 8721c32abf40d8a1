pub mod fallback;
pub mod leave_game;
pub mod profile;
pub mod rename;
pub mod start;
pub mod start_game;

use teloxide::utils::command::BotCommands;

use crate::bot_handler::{Context, Reply};

/// Commands understood outside the rename dialogue.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    /// Creates the profile or greets its owner.
    #[command(description = "Start the bot and show welcome message.")]
    Start,
    /// Shows the profile with its buttons.
    #[command(description = "Show your profile.")]
    Profile,
    /// Puts the conversation in a game.
    #[command(description = "Join a game.")]
    StartGame,
    /// Takes the conversation out of its game, when allowed.
    #[command(description = "Leave the current game.")]
    LeaveGame,
}

impl Command {
    /// The exact text that invokes this command.
    pub fn literal(&self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::Profile => "/profile",
            Command::StartGame => "/startgame",
            Command::LeaveGame => "/leavegame",
        }
    }

    /// Runs the command against the conversation in `ctx`.
    pub fn handle(self, ctx: Context<'_>) -> Vec<Reply> {
        match self {
            Command::Start => start::handle(ctx),
            Command::Profile => profile::handle(ctx),
            Command::StartGame => start_game::handle(ctx),
            Command::LeaveGame => leave_game::handle(ctx),
        }
    }
}
