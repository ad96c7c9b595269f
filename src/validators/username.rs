use crate::core::field::Validation;
use crate::validators::rules::{Rule, ascii_letters, min_length, required, run_rules};
use crate::validators::{AT_LEAST_3_CHARS, NOT_EMPTY, USE_ONLY_CHARS};

const MIN_USERNAME_LEN: usize = 3;

fn username_rules() -> [Rule; 3] {
    [
        ascii_letters(USE_ONLY_CHARS),
        required(NOT_EMPTY),
        min_length(MIN_USERNAME_LEN, AT_LEAST_3_CHARS),
    ]
}

/// A username is at least three ASCII letters.
///
/// The character-set error takes precedence over the length errors.
pub fn validate_username(username: &str) -> Validation {
    run_rules(&username_rules(), username)
}
