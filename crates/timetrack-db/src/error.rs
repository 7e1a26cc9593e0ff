use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("User info lookup failed: {0}")]
    InfoLookup(String),
}

impl Error {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Error::NotFound(format!("{} {}", entity, id))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("no rows returned".to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned());
                match code.as_deref() {
                    // unique, foreign key, not null, check
                    Some("23505" | "23503" | "23502" | "23514") => {
                        Error::ConstraintViolation(db_err.message().to_string())
                    }
                    // invalid text representation, string too long, numeric out of range
                    Some("22P02" | "22001" | "22003") => {
                        Error::InvalidInput(db_err.message().to_string())
                    }
                    // query_canceled
                    Some("57014") => Error::Cancelled(db_err.message().to_string()),
                    Some(code) => Error::StorageUnavailable(format!(
                        "database error ({}): {}",
                        code,
                        db_err.message()
                    )),
                    None => Error::StorageUnavailable(db_err.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => {
                Error::StorageUnavailable("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => {
                Error::StorageUnavailable("connection pool is closed".to_string())
            }
            other => Error::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<timetrack_core::Error> for Error {
    fn from(err: timetrack_core::Error) -> Self {
        match err {
            timetrack_core::Error::InvalidPassport(_) => Error::InvalidInput(err.to_string()),
            timetrack_core::Error::InfoLookup(msg) => Error::InfoLookup(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
