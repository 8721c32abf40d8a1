use crate::{
    bot_handler::{Context, Reply},
    classifier::Callback,
    messaging::texts,
    storage::ConversationState,
};

/// Starts the rename dialogue. Applies from any state once a profile exists.
pub fn handle(ctx: Context<'_>, callback: &Callback) -> Vec<Reply> {
    let Some(profile) = ctx.registry.get_mut(ctx.chat_id) else {
        return vec![Reply::acknowledge(&callback.query_id, texts::START_FIRST)];
    };

    profile.state = ConversationState::AwaitingName;

    vec![
        Reply::text(ctx.chat_id, texts::RENAME_PROMPT),
        Reply::acknowledge(&callback.query_id, texts::RENAME_ACK),
    ]
}
