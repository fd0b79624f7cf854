//! Backfill error types

use namehub_common::classify::CategoryTag;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackfillError {
    #[error("No {kind} named '{label}' exists for tag {tag:?}")]
    MissingTarget {
        tag: CategoryTag,
        kind: &'static str,
        label: &'static str,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<namehub_common::errors::AppError> for BackfillError {
    fn from(e: namehub_common::errors::AppError) -> Self {
        BackfillError::DatabaseError(e.to_string())
    }
}
