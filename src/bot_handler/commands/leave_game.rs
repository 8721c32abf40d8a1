use super::fallback;
use crate::{
    bot_handler::{Context, Reply},
    messaging::texts,
    storage::ConversationState,
};

pub fn handle(ctx: Context<'_>) -> Vec<Reply> {
    let in_game = ctx
        .registry
        .get(ctx.chat_id)
        .is_some_and(|profile| profile.state == ConversationState::InGame);

    if !in_game {
        return fallback::handle(ctx, "/leavegame");
    }

    if let Some(profile) = ctx.registry.get_mut(ctx.chat_id) {
        profile.state = ConversationState::Idle;
    }
    ctx.registry.remove_participant(ctx.chat_id);

    vec![Reply::text(ctx.chat_id, texts::LEFT_GAME)]
}
