use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::core::config::FormConfig;
use crate::core::error::FormError;
use crate::core::field::FieldState;
use crate::core::gather::{FlatForm, flatten};
use crate::core::value::Value;
use crate::validators::{
    NOT_EMPTY, SELECT_A_COUNTRY_FROM_THE_LIST, SET_TAX_IDENTIFIER, TaxIdPolicy,
    insert_and_validate, validate_country, validate_username,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Username,
    Country,
    TaxIdentifier,
}

impl FieldName {
    pub const ALL: [FieldName; 3] = [Self::Username, Self::Country, Self::TaxIdentifier];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Country => "country",
            Self::TaxIdentifier => "taxIdentifier",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Country => "Country",
            Self::TaxIdentifier => "Tax identifier",
        }
    }

    fn expected_payload(self) -> &'static str {
        match self {
            Self::Username | Self::Country => "text",
            Self::TaxIdentifier => "a keystroke",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Raw input routed to a field by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Full current text of a username or country input.
    Text(String),
    /// One tax identifier keystroke. `key: None` re-validates `sequence`.
    Keystroke {
        key: Option<char>,
        sequence: Vec<char>,
        country: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    pub name: FieldName,
    pub state: FieldState,
}

/// Routes `raw` to the validator of `field`.
///
/// Unknown field names and mismatched payloads are logged and yield `None`.
pub fn apply_edit(config: &FormConfig, field: &str, raw: RawValue) -> Option<NamedField> {
    match try_apply_edit(config, field, raw) {
        Ok(named) => Some(named),
        Err(err) => {
            warn!(field, error = %err, "field not implemented");
            None
        }
    }
}

pub fn try_apply_edit(
    config: &FormConfig,
    field: &str,
    raw: RawValue,
) -> Result<NamedField, FormError> {
    let name: FieldName = field.parse()?;
    let state = match (name, raw) {
        (FieldName::Username, RawValue::Text(text)) => {
            let validation = validate_username(text.as_str());
            FieldState::edited(text, validation)
        }
        (FieldName::Country, RawValue::Text(text)) => {
            let validation = validate_country(&config.countries, text.as_str());
            FieldState::edited(text, validation)
        }
        (
            FieldName::TaxIdentifier,
            RawValue::Keystroke {
                key,
                sequence,
                country,
            },
        ) => {
            let result = insert_and_validate(key, &sequence, country.as_str());
            let validation = result.validation();
            FieldState::edited(result.value, validation)
        }
        (name, _) => {
            return Err(FormError::PayloadMismatch {
                field: name.as_str(),
                expected: name.expected_payload(),
            });
        }
    };
    Ok(NamedField { name, state })
}

/// Snapshot of the whole form. Every edit produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub username: FieldState,
    pub country: FieldState,
    pub tax_identifier: FieldState,
}

impl Default for FormState {
    fn default() -> Self {
        Self::empty()
    }
}

impl FormState {
    pub fn empty() -> Self {
        Self {
            username: FieldState::pristine("", NOT_EMPTY),
            country: FieldState::pristine("", SELECT_A_COUNTRY_FROM_THE_LIST),
            tax_identifier: FieldState::pristine(Vec::<char>::new(), SET_TAX_IDENTIFIER),
        }
    }

    /// Runs each value through the dispatcher as if typed in one go.
    ///
    /// A tax identifier without separators is formatted for the selected
    /// country first; the result is then re-validated as-is.
    pub fn fill(config: &FormConfig, username: &str, country: &str, tax_identifier: &str) -> Self {
        let policy = TaxIdPolicy::for_country(country);
        let tax_identifier = if tax_identifier.contains('-') {
            tax_identifier.to_string()
        } else {
            policy.format(tax_identifier)
        };

        Self::empty()
            .edit_text(config, FieldName::Username, username)
            .edit_text(config, FieldName::Country, country)
            .edit(
                config,
                FieldName::TaxIdentifier,
                RawValue::Keystroke {
                    key: None,
                    sequence: tax_identifier.chars().collect(),
                    country: country.to_string(),
                },
            )
    }

    pub fn field(&self, name: FieldName) -> &FieldState {
        match name {
            FieldName::Username => &self.username,
            FieldName::Country => &self.country,
            FieldName::TaxIdentifier => &self.tax_identifier,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldName, &FieldState)> + '_ {
        FieldName::ALL
            .into_iter()
            .map(move |name| (name, self.field(name)))
    }

    pub fn with_field(&self, named: NamedField) -> Self {
        let mut next = self.clone();
        match named.name {
            FieldName::Username => next.username = named.state,
            FieldName::Country => next.country = named.state,
            FieldName::TaxIdentifier => next.tax_identifier = named.state,
        }
        next
    }

    pub fn edit(&self, config: &FormConfig, name: FieldName, raw: RawValue) -> Self {
        match apply_edit(config, name.as_str(), raw) {
            Some(named) => self.with_field(named),
            None => self.clone(),
        }
    }

    pub fn edit_text(&self, config: &FormConfig, name: FieldName, text: &str) -> Self {
        self.edit(config, name, RawValue::Text(text.to_string()))
    }

    pub fn country_name(&self) -> String {
        self.country.value.to_plain()
    }

    pub fn tax_sequence(&self) -> &[char] {
        self.tax_identifier.value.as_chars().unwrap_or_default()
    }

    pub fn tax_policy(&self) -> TaxIdPolicy {
        TaxIdPolicy::for_country(self.country_name().as_str())
    }

    pub fn press_tax_key(&self, config: &FormConfig, key: char) -> Self {
        self.edit(
            config,
            FieldName::TaxIdentifier,
            RawValue::Keystroke {
                key: Some(key),
                sequence: self.tax_sequence().to_vec(),
                country: self.country_name(),
            },
        )
    }

    /// Drops the last tax identifier character and re-validates what is left.
    pub fn delete_tax_char(&self, config: &FormConfig) -> Self {
        let mut sequence = self.tax_sequence().to_vec();
        if sequence.pop().is_none() {
            return self.clone();
        }
        self.edit(
            config,
            FieldName::TaxIdentifier,
            RawValue::Keystroke {
                key: None,
                sequence,
                country: self.country_name(),
            },
        )
    }

    /// Picks a suggested country; the tax identifier is cleared because its
    /// mask may no longer apply.
    pub fn select_country(&self, country: &str) -> Self {
        let mut next = self.clone();
        next.country = FieldState {
            value: Value::from(country),
            error: String::new(),
            is_valid: true,
            ..self.country.clone()
        };
        next.tax_identifier.value = Value::Chars(Vec::new());
        next
    }

    pub fn has_visible_errors(&self) -> bool {
        self.fields()
            .any(|(_, field)| field.visible_error().is_some())
    }

    pub fn is_valid(&self) -> bool {
        self.fields().all(|(_, field)| field.is_valid)
    }

    pub fn flatten(&self) -> FlatForm {
        flatten(self)
    }
}
