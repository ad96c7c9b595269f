use crate::core::field::Validation;
use crate::validators::{COUNTRY_NOT_ON_LIST, SELECT_A_COUNTRY_FROM_THE_LIST};

/// Case-insensitive substring filter over `countries`, keeping list order.
/// Empty input matches everything.
pub fn filter_countries<'a, S: AsRef<str>>(countries: &'a [S], input: &str) -> Vec<&'a str> {
    let needle = input.to_lowercase();
    countries
        .iter()
        .map(AsRef::as_ref)
        .filter(|country| needle.is_empty() || country.to_lowercase().contains(&needle))
        .collect()
}

/// Valid only for an exact, case-sensitive member of `countries`.
///
/// When the input no longer matches any country as a substring the error
/// tells the user to stop typing; otherwise it asks them to pick from the list.
pub fn validate_country<S: AsRef<str>>(countries: &[S], input: &str) -> Validation {
    if filter_countries(countries, input).is_empty() {
        return Validation::invalid(COUNTRY_NOT_ON_LIST);
    }

    if countries.iter().any(|country| country.as_ref() == input) {
        Validation::valid()
    } else {
        Validation::invalid(SELECT_A_COUNTRY_FROM_THE_LIST)
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_countries, validate_country};
    use crate::core::config::DEFAULT_COUNTRIES;
    use crate::core::field::Validation;
    use crate::validators::{COUNTRY_NOT_ON_LIST, SELECT_A_COUNTRY_FROM_THE_LIST};

    #[test]
    fn filter_keeps_substring_matches() {
        let countries = ["Country", "Altceva"];
        assert_eq!(filter_countries(&countries, "Country"), vec!["Country"]);
        assert!(filter_countries(&countries, "Spain").is_empty());
    }

    #[test]
    fn filter_ignores_case_and_keeps_order() {
        assert_eq!(
            filter_countries(DEFAULT_COUNTRIES, "an"),
            vec!["France", "Germany", "Canada"]
        );
        assert_eq!(filter_countries(DEFAULT_COUNTRIES, "usa"), vec!["USA"]);
    }

    #[test]
    fn filter_with_empty_input_returns_all() {
        assert_eq!(filter_countries(DEFAULT_COUNTRIES, ""), DEFAULT_COUNTRIES.to_vec());
    }

    #[test]
    fn filter_treats_input_literally() {
        assert!(filter_countries(DEFAULT_COUNTRIES, ".*").is_empty());
        assert!(filter_countries(DEFAULT_COUNTRIES, "(").is_empty());
    }

    #[test]
    fn listed_countries_are_valid() {
        assert_eq!(validate_country(DEFAULT_COUNTRIES, "Spain"), Validation::valid());
        assert_eq!(validate_country(DEFAULT_COUNTRIES, "USA"), Validation::valid());
    }

    #[test]
    fn unknown_country_is_not_on_list() {
        assert_eq!(
            validate_country(DEFAULT_COUNTRIES, "Romania"),
            Validation::invalid(COUNTRY_NOT_ON_LIST)
        );
    }

    #[test]
    fn partial_or_miscased_name_asks_for_selection() {
        for input in ["", "Spa", "spain", "usa"] {
            assert_eq!(
                validate_country(DEFAULT_COUNTRIES, input),
                Validation::invalid(SELECT_A_COUNTRY_FROM_THE_LIST),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn country_list_is_substitutable() {
        let countries = vec!["Country".to_string(), "Altceva".to_string()];
        assert_eq!(validate_country(&countries, "Altceva"), Validation::valid());
        assert_eq!(
            validate_country(&countries, "Spain"),
            Validation::invalid(COUNTRY_NOT_ON_LIST)
        );
    }
}
