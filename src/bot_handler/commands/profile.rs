use crate::{
    bot_handler::{Context, Reply},
    messaging::{profile_buttons, texts},
};

pub fn handle(ctx: Context<'_>) -> Vec<Reply> {
    let Some(profile) = ctx.registry.get(ctx.chat_id) else {
        return vec![Reply::text(ctx.chat_id, texts::START_FIRST)];
    };

    vec![Reply::Choice {
        chat_id: ctx.chat_id,
        text: texts::profile_view(profile),
        buttons: profile_buttons(),
    }]
}
