use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid passport: {0}")]
    InvalidPassport(String),

    #[error("User info lookup failed: {0}")]
    InfoLookup(String),
}

pub type Result<T> = std::result::Result<T, Error>;
