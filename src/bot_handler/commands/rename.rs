use crate::{
    bot_handler::{Context, Reply, validate_name},
    messaging::texts,
    storage::ConversationState,
};

/// Handles the text sent while the conversation is awaiting a new name.
pub fn handle_reply(ctx: Context<'_>, text: &str) -> Vec<Reply> {
    let Some(profile) = ctx.registry.get_mut(ctx.chat_id) else {
        return vec![Reply::text(ctx.chat_id, texts::START_FIRST)];
    };

    match validate_name(text) {
        Ok(()) => {
            profile.name = text.to_string();
            profile.state = ConversationState::Idle;
            vec![Reply::text(ctx.chat_id, texts::name_changed(text))]
        }
        Err(e) => {
            tracing::debug!("Rejected name for chat {}: {e}", ctx.chat_id);
            vec![Reply::text(ctx.chat_id, texts::NAME_REJECTED)]
        }
    }
}
