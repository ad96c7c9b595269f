use crate::core::field::Validation;

pub type RuleError = String;
pub type Rule = Box<dyn Fn(&str) -> Result<(), RuleError> + Send + Sync>;

/// Run `rules` in order against `value`, returning the first error.
///
/// Put the most specific rule first: it wins whenever several would fail.
pub fn run_rules(rules: &[Rule], value: &str) -> Validation {
    for rule in rules {
        if let Err(error) = rule(value) {
            return Validation::invalid(error);
        }
    }
    Validation::valid()
}

pub fn required(message: impl Into<String>) -> Rule {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn min_length(min_len: usize, message: impl Into<String>) -> Rule {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.chars().count() < min_len {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

/// Fails when any character is outside `[a-zA-Z]`. Empty input passes.
pub fn ascii_letters(message: impl Into<String>) -> Rule {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.chars().all(|ch| ch.is_ascii_alphabetic()) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}
