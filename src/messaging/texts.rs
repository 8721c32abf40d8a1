//! User-facing reply texts.

use crate::storage::Profile;

/// Label of the rename button.
pub const RENAME_BUTTON: &str = "تغییر نام";
/// Label of the settings button.
pub const SETTINGS_BUTTON: &str = "تنظیمات بیشتر";

/// Name rules, sent when a rename starts.
pub const RENAME_PROMPT: &str =
    "👤 لطفا یک نام فارسی بین 3 تا 15 حرف انتخاب کنید. (فقط حروف فارسی، بدون عدد و شکلک)";
/// Notice for a rename button press.
pub const RENAME_ACK: &str = "در حال تغییر نام";
/// Sent when the proposed name breaks the rules.
pub const NAME_REJECTED: &str = "❌ نام وارد شده نامعتبر است. لطفا فقط از حروف فارسی (بین 3 تا 15 \
                                 حرف) استفاده کنید. دوباره تلاش کنید:";

/// Replaces the profile message when settings are opened.
pub const SETTINGS_VIEW: &str = "شما در تنظیمات هستید:";
/// Notice for a settings button press.
pub const SETTINGS_ACK: &str = SETTINGS_BUTTON;

/// Welcome sent on the first `/start`.
pub const ONBOARDING: &str = "سلام👋\nبه ربات بازی مافیا خوش آمدید🌹\nمی‌توانید با دستور /profile \
                              و دکمه تغییر نام، نام خود را تغییر دهید👤";
/// Hint for chats that have not sent `/start` yet.
pub const START_FIRST: &str = "ابتدا با دستور /start ربات را شروع کنید.";
/// Notice for a button the bot does not know.
pub const UNSUPPORTED_ACTION: &str = "این گزینه پشتیبانی نمی‌شود.";
/// Confirms `/leavegame`.
pub const LEFT_GAME: &str = "شما از بازی خارج شدید.";

/// Welcome back for a known profile.
pub fn greeting(name: &str) -> String {
    format!("سلام👋 {name}")
}

/// Confirms a rename.
pub fn name_changed(name: &str) -> String {
    format!("✅ نام شما با موفقیت به {name} تغییر یافت.")
}

/// The profile card shown by `/profile`.
pub fn profile_view(profile: &Profile) -> String {
    format!(
        "پروفایل بازیکن👤\n\n💢 آیدی: {}\n✏ نام: {}\n💰 سکه: {}\n⭐ امتیاز: {}",
        profile.id, profile.name, profile.coins, profile.score
    )
}

/// "I didn't understand you."
pub fn not_understood(text: &str) -> String {
    format!("{text}؟")
}

/// Echo of a text sent while in a game.
pub fn in_game_echo(name: &str, text: &str) -> String {
    format!("{name}: {text}")
}
