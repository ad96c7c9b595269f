use crate::core::value::Value;
use serde::Serialize;

/// Outcome of running a validator over raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    pub error: String,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: String::new(),
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: error.into(),
        }
    }
}

/// Value, validity and error of one form input.
///
/// A pristine field has never been edited; its error is kept but not shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub value: Value,
    pub is_valid: bool,
    pub is_pristine: bool,
    pub error: String,
}

impl FieldState {
    pub fn pristine(value: impl Into<Value>, error: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_valid: false,
            is_pristine: true,
            error: error.into(),
        }
    }

    pub fn edited(value: impl Into<Value>, validation: Validation) -> Self {
        Self {
            value: value.into(),
            is_valid: validation.is_valid,
            is_pristine: false,
            error: validation.error,
        }
    }

    pub fn visible_error(&self) -> Option<&str> {
        if self.is_pristine || self.is_valid {
            None
        } else {
            Some(self.error.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldState, Validation};

    #[test]
    fn pristine_field_hides_its_error() {
        let field = FieldState::pristine("", "not empty");
        assert!(!field.is_valid);
        assert_eq!(field.error, "not empty");
        assert_eq!(field.visible_error(), None);
    }

    #[test]
    fn edited_invalid_field_shows_error() {
        let field = FieldState::edited("aa", Validation::invalid("at least 3 chars"));
        assert!(!field.is_pristine);
        assert_eq!(field.visible_error(), Some("at least 3 chars"));

        let field = FieldState::edited("aaa", Validation::valid());
        assert_eq!(field.visible_error(), None);
    }
}
