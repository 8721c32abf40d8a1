use serde::{Deserialize, Serialize};

/// Actions carried by inline buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallbackAction {
    /// Starts the rename dialogue.
    #[serde(rename = "changeName")]
    ChangeName,
    /// Opens the settings view.
    #[serde(rename = "setting")]
    Settings,
}

/// Serializes a `CallbackAction` to a JSON string. Used for keyboard buttons.
/// expect is ok because inputs are simple and controlled.
pub fn serialize_action(action: &CallbackAction) -> String {
    serde_json::to_string(action).expect("Failed to serialize action")
}

/// Reads a button payload back. Both the JSON form and the bare name used by
/// older keyboards are accepted. Unknown payloads yield `None`.
pub fn parse_action(payload: &str) -> Option<CallbackAction> {
    serde_json::from_str(payload)
        .or_else(|_| serde_json::from_value(serde_json::Value::String(payload.to_string())))
        .ok()
}
