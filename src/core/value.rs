use serde::Serialize;

/// Raw value held by a form field.
///
/// Text fields keep a plain string. The tax identifier keeps the exact
/// characters accepted by its mask, one per slot, so the masked inserter can
/// inspect and extend it positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Chars(Vec<char>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            Self::Chars(_) => None,
        }
    }

    pub fn as_chars(&self) -> Option<&[char]> {
        match self {
            Self::Chars(v) => Some(v.as_slice()),
            Self::Text(_) => None,
        }
    }

    /// Joins a character sequence into a string; text passes through.
    pub fn to_plain(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            Self::Chars(v) => v.iter().collect(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<char>> for Value {
    fn from(value: Vec<char>) -> Self {
        Self::Chars(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn chars_join_into_plain_string() {
        let value = Value::from(vec!['1', '2', '-', 'a']);
        assert_eq!(value.to_plain(), "12-a");
        assert_eq!(value.as_text(), None);
    }

    #[test]
    fn text_passes_through() {
        let value = Value::from("Spain");
        assert_eq!(value.to_plain(), "Spain");
        assert_eq!(value.as_text(), Some("Spain"));
        assert_eq!(value.as_chars(), None);
    }

    #[test]
    fn serializes_without_variant_tag() {
        let text = serde_json::to_value(Value::from("abc")).expect("serialize");
        assert_eq!(text, serde_json::json!("abc"));

        let chars = serde_json::to_value(Value::from(vec!['1', '-'])).expect("serialize");
        assert_eq!(chars, serde_json::json!(["1", "-"]));
    }
}
