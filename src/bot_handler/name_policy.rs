use std::ops::RangeInclusive;

use thiserror::Error;

/// Shortest accepted name, in characters.
pub const MIN_NAME_LEN: usize = 3;
/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 15;

const PERSIAN_BLOCK: RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

/// Why a requested name was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// Fewer characters than [`MIN_NAME_LEN`].
    #[error("Name must have at least 3 characters")]
    TooShort,
    /// More characters than [`MAX_NAME_LEN`].
    #[error("Name must have at most 15 characters")]
    TooLong,
    /// The first character outside the Persian block.
    #[error("Character {0:?} is not a Persian letter")]
    InvalidCharacter(char),
}

/// Checks a requested display name: 3 to 15 characters, all from the
/// Arabic-script block used for Persian.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let len = name.chars().count();

    if len < MIN_NAME_LEN {
        return Err(NameError::TooShort);
    }
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }

    match name.chars().find(|c| !PERSIAN_BLOCK.contains(c)) {
        Some(c) => Err(NameError::InvalidCharacter(c)),
        None => Ok(()),
    }
}
