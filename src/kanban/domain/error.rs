//! Error types for kanban domain validation and parsing.

use super::{BucketId, ViewId};
use thiserror::Error;

/// Errors returned while constructing kanban domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KanbanDomainError {
    /// The bucket title is empty after trimming.
    #[error("bucket title must not be empty")]
    EmptyBucketTitle,

    /// The bucket title exceeds the storage limit.
    #[error("bucket title exceeds {max} characters (got {length})")]
    BucketTitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The bucket limit does not fit the persisted column.
    #[error("bucket limit {0} is too large")]
    BucketLimitTooLarge(u32),

    /// The bucket position is not a finite number.
    #[error("bucket position must be a finite number, got {0}")]
    InvalidPosition(f64),

    /// A view reference was pointed at a bucket of another view.
    #[error("bucket {bucket_id} belongs to another view than {view_id}")]
    BucketOutsideView {
        /// Offending bucket.
        bucket_id: BucketId,
        /// View whose reference was being set.
        view_id: ViewId,
    },

    /// A stored creator identifier was zero.
    #[error("principal identifier must not be zero")]
    ZeroPrincipal,
}

/// Error returned while parsing view kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project view kind: {0}")]
pub struct ParseViewKindError(pub String);

/// Error returned while parsing bucket configuration modes from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown bucket configuration mode: {0}")]
pub struct ParseBucketConfigurationModeError(pub String);
