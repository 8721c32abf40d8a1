use crate::{
    bot_handler::{Context, Reply},
    messaging::texts,
};

pub fn handle(ctx: Context<'_>) -> Vec<Reply> {
    if let Some(profile) = ctx.registry.get(ctx.chat_id) {
        return vec![Reply::text(ctx.chat_id, texts::greeting(&profile.name))];
    }

    ctx.registry.get_or_create(ctx.chat_id);
    vec![Reply::text(ctx.chat_id, texts::ONBOARDING)]
}
