use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("received non-200 response code: {0}")]
    Status(u16),

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<Error> for timetrack_core::Error {
    fn from(err: Error) -> Self {
        timetrack_core::Error::InfoLookup(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
