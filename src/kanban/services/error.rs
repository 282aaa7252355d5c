//! Service-level errors for board operations.

use crate::kanban::{
    domain::{BucketId, KanbanDomainError, ProjectId, TaskId, ViewId},
    ports::{CollaboratorError, KanbanRepositoryError, TaskGatewayError},
};
use thiserror::Error;

/// Errors returned by board services.
///
/// The named variants are expected outcomes callers branch on; the wrapped
/// variants pass lower-level failures through unchanged.
#[derive(Debug, Error)]
pub enum KanbanError {
    /// No bucket has the given identifier.
    #[error("bucket {0} does not exist")]
    BucketDoesNotExist(BucketId),

    /// No view has the given identifier within the addressed project.
    #[error("project view {0} does not exist")]
    ViewDoesNotExist(ViewId),

    /// Deleting the bucket would leave its view without buckets.
    #[error("bucket {bucket_id} is the last bucket of view {view_id} and cannot be removed")]
    CannotRemoveLastBucket {
        /// Bucket whose deletion was refused.
        bucket_id: BucketId,
        /// View the bucket belongs to.
        view_id: ViewId,
    },

    /// The target bucket belongs to another view.
    #[error("bucket {bucket_id} does not belong to project view {view_id}")]
    BucketDoesNotBelongToProjectView {
        /// View addressed by the request.
        view_id: ViewId,
        /// Bucket addressed by the request.
        bucket_id: BucketId,
    },

    /// The target bucket is full.
    #[error("bucket {bucket_id} has reached its limit of {limit} tasks; task {task_id} cannot join")]
    BucketLimitExceeded {
        /// Task being moved.
        task_id: TaskId,
        /// Full bucket.
        bucket_id: BucketId,
        /// Configured limit.
        limit: u32,
    },

    /// A concurrent writer placed the task in the view first.
    #[error("task {task_id} already has a bucket in project view {view_id}")]
    TaskAlreadyExistsInBucket {
        /// Task being placed.
        task_id: TaskId,
        /// View of the conflicting placement.
        view_id: ViewId,
    },

    /// The task belongs to a different project than the board it is placed on.
    #[error("task {task_id} does not belong to project {project_id}")]
    TaskOutsideProject {
        /// Task being placed.
        task_id: TaskId,
        /// Project owning the target view.
        project_id: ProjectId,
    },

    /// The permission oracle refused the operation.
    #[error("access to project {project_id} denied")]
    AccessDenied {
        /// Project the permission was checked on.
        project_id: ProjectId,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] KanbanDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] KanbanRepositoryError),

    /// Task gateway refused or failed.
    #[error(transparent)]
    Task(#[from] TaskGatewayError),

    /// Another collaborator failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Result type for board services.
pub type KanbanResult<T> = Result<T, KanbanError>;
