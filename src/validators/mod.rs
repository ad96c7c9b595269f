pub mod country;
pub mod rules;
pub mod tax_id;
pub mod username;

pub use country::{filter_countries, validate_country};
pub use tax_id::{TaxIdPolicy, TaxIdValidation, insert_and_validate};
pub use username::validate_username;

pub const NOT_EMPTY: &str = "not empty";
pub const AT_LEAST_3_CHARS: &str = "at least 3 chars";
pub const USE_ONLY_CHARS: &str = "use only chars";
pub const SELECT_A_COUNTRY_FROM_THE_LIST: &str = "select a country from the list";
pub const COUNTRY_NOT_ON_LIST: &str =
    "your knowledge on countries is too big or provided country is not on our list";
pub const SET_TAX_IDENTIFIER: &str = "set tax identifier";
pub const WRONG_TAX_IDENTIFIER_FORMAT: &str = "wrong tax identifier format";
