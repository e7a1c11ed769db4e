use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Unique or foreign-key violation reported by the database.
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Constraint(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ModelError::Constraint(msg),
            _ => ModelError::Db(e.to_string()),
        }
    }
}
