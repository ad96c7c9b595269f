pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod gather;
pub mod value;
