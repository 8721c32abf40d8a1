use crate::{
    bot_handler::{Context, Reply},
    messaging::texts,
    storage::ConversationState,
};

/// Any text that is not a command.
pub fn handle(ctx: Context<'_>, text: &str) -> Vec<Reply> {
    match ctx.registry.get(ctx.chat_id) {
        Some(profile) if profile.state == ConversationState::InGame => {
            // Only the sender hears the message until games have more than one seat.
            if profile.id == ctx.chat_id {
                vec![Reply::text(profile.id, texts::in_game_echo(&profile.name, text))]
            } else {
                Vec::new()
            }
        }
        _ => vec![Reply::text(ctx.chat_id, texts::not_understood(text))],
    }
}
