use lazy_static::lazy_static;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::texts;
use crate::bot_handler::{CallbackAction, serialize_action};

/// A labelled inline button carrying an opaque callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceButton {
    /// The text shown on the button.
    pub label: String,
    /// The callback data sent back when pressed.
    pub payload: String,
}

impl ChoiceButton {
    /// A button that sends `action` back when pressed.
    pub fn new(label: impl Into<String>, action: &CallbackAction) -> Self {
        Self { label: label.into(), payload: serialize_action(action) }
    }
}

/// Renders the buttons as a single keyboard row.
pub fn build_choice_keyboard(buttons: &[ChoiceButton]) -> InlineKeyboardMarkup {
    let row = buttons
        .iter()
        .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.payload.clone()))
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(vec![row])
}

/// Buttons attached to the profile view.
pub fn profile_buttons() -> Vec<ChoiceButton> {
    PROFILE_BUTTONS.clone()
}

lazy_static! {
    static ref PROFILE_BUTTONS: Vec<ChoiceButton> = vec![
        ChoiceButton::new(texts::RENAME_BUTTON, &CallbackAction::ChangeName),
        ChoiceButton::new(texts::SETTINGS_BUTTON, &CallbackAction::Settings),
    ];
}
