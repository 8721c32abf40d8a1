use crate::{bot_handler::Reply, classifier::Callback, messaging::texts};

pub fn handle(callback: &Callback) -> Vec<Reply> {
    vec![
        Reply::EditText { message: callback.message, text: texts::SETTINGS_VIEW.to_string() },
        Reply::acknowledge(&callback.query_id, texts::SETTINGS_ACK),
    ]
}
