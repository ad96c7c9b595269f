pub mod app;
pub mod core;
pub mod terminal;
pub mod ui;
pub mod validators;

pub use crate::core::config::FormConfig;
pub use crate::core::error::{AppError, ConfigError, FormError};
pub use crate::core::field::{FieldState, Validation};
pub use crate::core::form::{FieldName, FormState, NamedField, RawValue, apply_edit, try_apply_edit};
pub use crate::core::gather::{FlatForm, flatten};
pub use crate::core::value::Value;

pub use validators::{
    TaxIdPolicy, TaxIdValidation, filter_countries, insert_and_validate, validate_country,
    validate_username,
};
