use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },
    #[error("invalid period: month {month} is not between 1 and 12")]
    InvalidMonth { month: u32 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
