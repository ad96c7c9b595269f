mod mask;

use std::sync::LazyLock;

use regex::Regex;

use crate::core::field::Validation;
use crate::validators::WRONG_TAX_IDENTIFIER_FORMAT;
use mask::MaskToken;

static USA_MASK: LazyLock<Vec<MaskToken>> = LazyLock::new(|| mask::parse_mask("#{4}-A{3}-#{6}"));
static CANADA_MASK: LazyLock<Vec<MaskToken>> = LazyLock::new(|| mask::parse_mask("#{10}-A{2}"));

static USA_VALID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-.{3}-[0-9]{5,7}$").expect("USA tax identifier pattern")
});
static CANADA_VALID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]|A|B|D){10}-(.{2})$").expect("Canada tax identifier pattern")
});

static USA_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})(.{3})([0-9]{5,7})").expect("USA tax identifier format")
});
static CANADA_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<body>(?:[0-9]|A|B|D){10})(?P<suffix>.{2})")
        .expect("Canada tax identifier format")
});

/// Tax identifier rules for a country.
///
/// `Any` covers every country without a dedicated mask: it takes every
/// character and is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdPolicy {
    Usa,
    Canada,
    Any,
}

impl TaxIdPolicy {
    pub fn for_country(country: &str) -> Self {
        match country {
            "USA" => Self::Usa,
            "Canada" => Self::Canada,
            _ => Self::Any,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Canada => "Canada",
            Self::Any => "any",
        }
    }

    fn mask(self) -> Option<&'static [MaskToken]> {
        match self {
            Self::Usa => Some(USA_MASK.as_slice()),
            Self::Canada => Some(CANADA_MASK.as_slice()),
            Self::Any => None,
        }
    }

    /// Placeholder shown for an empty identifier, e.g. `____-___-______`.
    pub fn template(self) -> String {
        self.mask().map(mask::template).unwrap_or_default()
    }

    /// Checks the complete, joined identifier.
    ///
    /// Canada also admits `A`, `B` and `D` among its first ten characters
    /// even though typing only ever accepts digits there.
    pub fn is_valid(self, flat: &str) -> bool {
        match self {
            Self::Usa => USA_VALID.is_match(flat),
            Self::Canada => CANADA_VALID.is_match(flat),
            Self::Any => true,
        }
    }

    /// Inserts separators into an identifier typed without them.
    /// Input that does not fit the pattern comes back unchanged.
    pub fn format(self, flat: &str) -> String {
        match self {
            Self::Usa => USA_FORMAT.replace(flat, "${1}-${2}-${3}").into_owned(),
            Self::Canada => CANADA_FORMAT.replace(flat, "${body}-${suffix}").into_owned(),
            Self::Any => flat.to_string(),
        }
    }

    pub fn push_char(self, ch: char, sequence: &[char]) -> Vec<char> {
        match self.mask() {
            Some(tokens) => mask::push_char(tokens, ch, sequence),
            None => {
                let mut out = sequence.to_vec();
                out.push(ch);
                out
            }
        }
    }

    pub fn masked_display(self, sequence: &[char]) -> String {
        mask::overlay(self.template().as_str(), sequence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxIdValidation {
    pub value: Vec<char>,
    pub is_valid: bool,
    pub error: String,
}

impl TaxIdValidation {
    pub fn validation(&self) -> Validation {
        Validation {
            is_valid: self.is_valid,
            error: self.error.clone(),
        }
    }
}

/// Feeds `key` through the mask of `country`, then validates the result.
///
/// With no key the sequence is only re-validated, which is how deletions are
/// handled: the caller shortens the sequence and passes `None`.
pub fn insert_and_validate(key: Option<char>, sequence: &[char], country: &str) -> TaxIdValidation {
    let policy = TaxIdPolicy::for_country(country);
    let value = match key {
        Some(ch) => policy.push_char(ch, sequence),
        None => sequence.to_vec(),
    };

    let flat: String = value.iter().collect();
    let is_valid = policy.is_valid(flat.as_str());

    TaxIdValidation {
        value,
        is_valid,
        error: if is_valid {
            String::new()
        } else {
            WRONG_TAX_IDENTIFIER_FORMAT.to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{TaxIdPolicy, TaxIdValidation, insert_and_validate};
    use crate::validators::WRONG_TAX_IDENTIFIER_FORMAT;

    fn chars(value: &str) -> Vec<char> {
        value.chars().collect()
    }

    fn type_keys(keys: &str, country: &str) -> TaxIdValidation {
        keys.chars().fold(
            insert_and_validate(None, &[], country),
            |state, key| insert_and_validate(Some(key), &state.value, country),
        )
    }

    #[test]
    fn policy_is_chosen_by_exact_country_name() {
        assert_eq!(TaxIdPolicy::for_country("USA"), TaxIdPolicy::Usa);
        assert_eq!(TaxIdPolicy::for_country("Canada"), TaxIdPolicy::Canada);
        assert_eq!(TaxIdPolicy::for_country("usa"), TaxIdPolicy::Any);
        assert_eq!(TaxIdPolicy::for_country(""), TaxIdPolicy::Any);
        assert_eq!(TaxIdPolicy::for_country("Spain").name(), "any");
    }

    #[test]
    fn usa_letter_in_digit_zone_is_dropped() {
        assert_eq!(
            insert_and_validate(Some('c'), &[], "USA"),
            TaxIdValidation {
                value: Vec::new(),
                is_valid: false,
                error: WRONG_TAX_IDENTIFIER_FORMAT.to_string(),
            }
        );
    }

    #[test]
    fn usa_sixth_digit_completes_identifier() {
        let result = insert_and_validate(Some('2'), &chars("1111-aaa-22222"), "USA");
        assert_eq!(result.value, chars("1111-aaa-222222"));
        assert!(result.is_valid);
        assert_eq!(result.error, "");
    }

    #[test]
    fn usa_typing_inserts_both_separators() {
        let result = type_keys("1234abc56789", "USA");
        assert_eq!(result.value, chars("1234-abc-56789"));
        assert!(result.is_valid);
    }

    #[test]
    fn usa_typed_separators_are_absorbed() {
        let result = type_keys("1234-abc-56789", "USA");
        assert_eq!(result.value, chars("1234-abc-56789"));
        assert!(result.is_valid);
    }

    #[test]
    fn usa_zones_enforce_character_classes() {
        let result = type_keys("12x34", "USA");
        assert_eq!(result.value, chars("1234-"));
        let result = type_keys("12345", "USA");
        assert_eq!(result.value, chars("1234-"));
        let result = type_keys("1234a1b2c3", "USA");
        assert_eq!(result.value, chars("1234-abc-3"));
        assert!(!result.is_valid);
    }

    #[test]
    fn usa_last_group_stops_at_six_digits() {
        let result = type_keys("1234abc12345678", "USA");
        assert_eq!(result.value, chars("1234-abc-123456"));
        assert!(result.is_valid);
    }

    #[test]
    fn key_after_deleted_separator_restores_it() {
        let result = insert_and_validate(Some('5'), &chars("1111"), "USA");
        assert_eq!(result.value, chars("1111-"));
        let result = insert_and_validate(Some('x'), &chars("1111-abc"), "USA");
        assert_eq!(result.value, chars("1111-abc-"));
    }

    #[test]
    fn canada_typing_completes_identifier() {
        let result = type_keys("0123456789xy", "Canada");
        assert_eq!(result.value, chars("0123456789-xy"));
        assert!(result.is_valid);
        let result = type_keys("0123456789xyz", "Canada");
        assert_eq!(result.value, chars("0123456789-xy"));
    }

    #[test]
    fn canada_suffix_accepts_letters_only() {
        let result = type_keys("01234567891x2y", "Canada");
        assert_eq!(result.value, chars("0123456789-xy"));
    }

    #[test]
    fn canada_typing_and_validity_disagree_on_abd() {
        // Typing never admits letters in the first ten slots...
        let typed = type_keys("AB01234567", "Canada");
        assert_eq!(typed.value, chars("01234567"));

        // ...yet an identifier carrying them is accepted on re-validation.
        let pasted = insert_and_validate(None, &chars("AB00000000-xy"), "Canada");
        assert!(pasted.is_valid);
        let pasted = insert_and_validate(None, &chars("AC00000000-xy"), "Canada");
        assert!(!pasted.is_valid);
    }

    #[test]
    fn revalidation_without_key_is_idempotent() {
        let complete = chars("1111-aaa-222222");
        let first = insert_and_validate(None, &complete, "USA");
        assert_eq!(first.value, complete);
        assert!(first.is_valid);
        assert_eq!(insert_and_validate(None, &first.value, "USA"), first);
    }

    #[test]
    fn shortened_sequence_revalidates_as_is() {
        let result = insert_and_validate(None, &chars("1111-aaa-2222"), "USA");
        assert_eq!(result.value, chars("1111-aaa-2222"));
        assert!(!result.is_valid);
        assert_eq!(result.error, WRONG_TAX_IDENTIFIER_FORMAT);
    }

    #[test]
    fn fallback_accepts_everything() {
        for country in ["Spain", "Germany", "", "Narnia"] {
            let result = type_keys("a1-€ ?", country);
            assert_eq!(result.value, chars("a1-€ ?"));
            assert!(result.is_valid);
            assert_eq!(result.error, "");
        }
        assert!(insert_and_validate(None, &[], "Italy").is_valid);
    }

    #[test]
    fn format_inserts_separators() {
        assert_eq!(TaxIdPolicy::Usa.format("1234abc12345"), "1234-abc-12345");
        assert_eq!(TaxIdPolicy::Canada.format("0123456789xy"), "0123456789-xy");
        assert_eq!(TaxIdPolicy::Canada.format("AB01234567xy"), "AB01234567-xy");
        assert_eq!(TaxIdPolicy::Usa.format("12"), "12");
        assert_eq!(TaxIdPolicy::Any.format("whatever"), "whatever");
    }

    #[test]
    fn masked_display_overlays_template() {
        assert_eq!(TaxIdPolicy::Usa.template(), "____-___-______");
        assert_eq!(TaxIdPolicy::Canada.template(), "__________-__");
        assert_eq!(TaxIdPolicy::Usa.masked_display(&chars("12")), "12__-___-______");
        assert_eq!(TaxIdPolicy::Any.masked_display(&chars("xyz")), "xyz");
    }
}

#[cfg(test)]
mod proptests {
    use super::{TaxIdPolicy, insert_and_validate};
    use proptest::prelude::*;

    /// Digits and letters often enough to fill the masks, plus anything else.
    fn key() -> impl Strategy<Value = char> {
        prop_oneof![
            prop::char::range('0', '9'),
            prop::char::range('a', 'z'),
            prop::char::range('A', 'D'),
            any::<char>(),
        ]
    }

    /// `None` stands for a backspace.
    fn keystrokes() -> impl Strategy<Value = Vec<Option<char>>> {
        prop::collection::vec(prop::option::weighted(0.85, key()), 0..60)
    }

    fn type_keystrokes(
        keys: &[Option<char>],
        country: &str,
        max_len: usize,
    ) -> Result<(), TestCaseError> {
        let mut sequence = Vec::new();
        for key in keys {
            let result = match key {
                Some(ch) => insert_and_validate(Some(*ch), &sequence, country),
                None => {
                    sequence.pop();
                    insert_and_validate(None, &sequence, country)
                }
            };
            prop_assert!(
                result.value.len() <= max_len,
                "{country} grew to {:?}",
                result.value
            );
            prop_assert_eq!(result.is_valid, result.error.is_empty());
            sequence = result.value;
        }
        Ok(())
    }

    proptest! {
        /// Countries without a mask take every character and stay valid.
        #[test]
        fn fallback_accepts_any_character(
            keys in prop::collection::vec(any::<char>(), 0..40),
            country in prop_oneof![
                Just("Spain".to_string()),
                Just("Greece".to_string()),
                Just(String::new()),
                "[a-zA-Z ]{1,12}",
            ],
        ) {
            prop_assume!(TaxIdPolicy::for_country(&country) == TaxIdPolicy::Any);
            let mut sequence = Vec::new();
            for key in keys {
                let result = insert_and_validate(Some(key), &sequence, &country);
                prop_assert_eq!(result.value.len(), sequence.len() + 1);
                prop_assert_eq!(result.value.last(), Some(&key));
                prop_assert!(result.is_valid);
                prop_assert_eq!(result.error.as_str(), "");
                sequence = result.value;
            }
        }

        /// USA identifiers never outgrow `____-___-______`.
        #[test]
        fn usa_stays_within_fifteen_chars(keys in keystrokes()) {
            type_keystrokes(&keys, "USA", 15)?;
        }

        /// Canada identifiers never outgrow `__________-__`.
        #[test]
        fn canada_stays_within_thirteen_chars(keys in keystrokes()) {
            type_keystrokes(&keys, "Canada", 13)?;
        }
    }
}
