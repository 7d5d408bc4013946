use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "Connection Error: {}", _0)]
    Connection(String),

    #[display(fmt = "{} Already Present", _0)]
    AlreadyPresent(String),

    #[display(fmt = "{} Not Found", _0)]
    NotFound(String),

    /// The database refused the statement, usually a trigger raising an exception.
    #[display(fmt = "Rejected by database: {}", _0)]
    Rejected(String),

    #[display(fmt = "Decode Error: {}", _0)]
    Decode(String),

    #[display(fmt = "Migration Error: {}", _0)]
    Migration(String),

    #[display(fmt = "Internal Error: {}", _0)]
    Internal(String),
}

impl std::error::Error for StoreError {}

impl From<DBError> for StoreError {
    fn from(error: DBError) -> StoreError {
        match error {
            DBError::DatabaseError(kind, info) => {
                let message = info.details().unwrap_or_else(|| info.message()).to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => StoreError::AlreadyPresent(message),
                    DatabaseErrorKind::ForeignKeyViolation => StoreError::NotFound(message),
                    _ => StoreError::Rejected(info.message().to_string()),
                }
            }
            DBError::NotFound => StoreError::NotFound("Row".to_string()),
            err => StoreError::Internal(format!("DB error, {}", err)),
        }
    }
}

impl From<diesel::ConnectionError> for StoreError {
    fn from(error: diesel::ConnectionError) -> StoreError {
        StoreError::Connection(error.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> StoreError {
        StoreError::Connection(format!("Pool error: {}", error))
    }
}

impl From<diesel_migrations::RunMigrationsError> for StoreError {
    fn from(error: diesel_migrations::RunMigrationsError) -> StoreError {
        StoreError::Migration(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> StoreError {
        StoreError::Decode(error.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
