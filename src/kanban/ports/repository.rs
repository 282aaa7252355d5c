//! Repository ports for buckets, views and task placements.

use crate::kanban::domain::{
    BoardView, Bucket, BucketId, NewBucket, ProjectId, TaskBucket, TaskId, ViewId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for kanban repository operations.
pub type KanbanRepositoryResult<T> = Result<T, KanbanRepositoryError>;

/// Bucket persistence contract.
#[async_trait]
pub trait BucketRepository: Send + Sync {
    /// Stores a new bucket and returns it with its assigned identifier.
    async fn insert(&self, draft: NewBucket) -> KanbanRepositoryResult<Bucket>;

    /// Persists the title, limit, position and view of an existing bucket.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::BucketNotFound`] when the bucket does
    /// not exist.
    async fn update(&self, bucket: &Bucket) -> KanbanRepositoryResult<()>;

    /// Finds a bucket by identifier.
    async fn find_by_id(&self, bucket_id: BucketId) -> KanbanRepositoryResult<Option<Bucket>>;

    /// Returns the buckets of a view ordered by position, then identifier.
    async fn list_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<Vec<Bucket>>;

    /// Counts the buckets of a view.
    async fn count_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<u64>;

    /// Deletes a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::BucketNotFound`] when the bucket does
    /// not exist.
    async fn delete(&self, bucket_id: BucketId) -> KanbanRepositoryResult<()>;
}

/// Read access to project views plus the bucket references the engine owns.
#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// Finds a view by identifier.
    async fn find_by_id(&self, view_id: ViewId) -> KanbanRepositoryResult<Option<BoardView>>;

    /// Returns every view of a project.
    async fn list_for_project(&self, project_id: ProjectId)
    -> KanbanRepositoryResult<Vec<BoardView>>;

    /// Persists the default and done bucket references of a view.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::ViewNotFound`] when the view does not
    /// exist.
    async fn update_bucket_references(&self, view: &BoardView) -> KanbanRepositoryResult<()>;
}

/// Task placement persistence contract.
///
/// The primitives are deliberately split (update, then insert) so the
/// uniqueness constraint on `(task_id, view_id)` is the only arbiter between
/// concurrent writers.
#[async_trait]
pub trait TaskBucketRepository: Send + Sync {
    /// Finds the placement of a task in a view.
    async fn find(
        &self,
        task_id: TaskId,
        view_id: ViewId,
    ) -> KanbanRepositoryResult<Option<TaskBucket>>;

    /// Points an existing placement at `bucket_id`; returns affected rows.
    async fn update_bucket(
        &self,
        task_id: TaskId,
        view_id: ViewId,
        bucket_id: BucketId,
    ) -> KanbanRepositoryResult<u64>;

    /// Stores a new placement.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::DuplicateAssignment`] when the task
    /// already has a placement in the view.
    async fn insert(&self, assignment: &TaskBucket) -> KanbanRepositoryResult<()>;

    /// Counts distinct tasks placed in a bucket.
    async fn count_tasks_in_bucket(&self, bucket_id: BucketId) -> KanbanRepositoryResult<u64>;

    /// Moves every placement in `from` to `to`; returns affected rows.
    async fn reassign_bucket(&self, from: BucketId, to: BucketId) -> KanbanRepositoryResult<u64>;

    /// Returns every placement in a view, ordered by task.
    ///
    /// Board services never call this. It is provided for embedders that
    /// render a whole board and for inspecting stored placements in tests.
    async fn list_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<Vec<TaskBucket>>;

    /// Returns the buckets holding the given tasks, restricted to views of
    /// the given projects.
    async fn find_buckets_for_tasks(
        &self,
        task_ids: &[TaskId],
        project_ids: &[ProjectId],
    ) -> KanbanRepositoryResult<Vec<(TaskId, Bucket)>>;
}

/// Errors returned by kanban repository implementations.
#[derive(Debug, Clone, Error)]
pub enum KanbanRepositoryError {
    /// The task already has a placement in the view.
    #[error("task {task_id} already has a placement in view {view_id}")]
    DuplicateAssignment {
        /// Task being placed.
        task_id: TaskId,
        /// View of the conflicting placement.
        view_id: ViewId,
    },

    /// The bucket was not found.
    #[error("bucket not found: {0}")]
    BucketNotFound(BucketId),

    /// The view was not found.
    #[error("project view not found: {0}")]
    ViewNotFound(ViewId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted kanban data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl KanbanRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
