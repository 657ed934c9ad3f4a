use thiserror::Error;

use crate::domain::TransactionId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Transaction {0} belongs to another profile")]
    NotOwner(TransactionId),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
