use crate::{
    bot_handler::{Context, Reply},
    messaging::texts,
    storage::{ConversationState, DEFAULT_ROLE, Participant},
};

pub fn handle(ctx: Context<'_>) -> Vec<Reply> {
    let Some(profile) = ctx.registry.get_mut(ctx.chat_id) else {
        return vec![Reply::text(ctx.chat_id, texts::START_FIRST)];
    };

    profile.state = ConversationState::InGame;
    ctx.registry.set_participant(Participant { owner: ctx.chat_id, role: DEFAULT_ROLE.to_string() });

    // Joining a game is silent.
    Vec::new()
}
