use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unknown filter column: {0}")]
    UnknownColumn(String),

    #[error("Column '{column}' is a {expected} filter")]
    WrongInputKind { column: String, expected: &'static str },

    #[error("'{value}' is not an option for column '{column}'")]
    OptionNotOffered { column: String, value: String },

    #[error("Invalid number for column '{column}': {value}")]
    InvalidNumber { column: String, value: String },

    #[error("Unsupported page size: {0}")]
    InvalidShowEntries(u32),
}
