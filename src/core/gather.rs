use indexmap::IndexMap;

use crate::core::form::FormState;

/// Field name to plain value, in form order.
pub type FlatForm = IndexMap<String, String>;

/// Flattens form state for submission. Character sequences are joined;
/// nothing is validated.
pub fn flatten(form: &FormState) -> FlatForm {
    form.fields()
        .map(|(name, field)| (name.as_str().to_string(), field.value.to_plain()))
        .collect()
}
