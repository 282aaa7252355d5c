//! Task placement store with conflict-aware upsert.

use super::{KanbanError, KanbanResult};
use crate::kanban::{
    domain::{Bucket, ProjectId, TaskBucket, TaskId, ViewId},
    ports::{KanbanRepositoryError, TaskBucketRepository},
};
use std::collections::HashMap;
use std::sync::Arc;

/// Owns the unique `(task, view) -> bucket` mapping.
#[derive(Clone)]
pub struct TaskBucketStore {
    task_buckets: Arc<dyn TaskBucketRepository>,
}

impl TaskBucketStore {
    /// Creates a store over the given placement repository.
    #[must_use]
    pub const fn new(task_buckets: Arc<dyn TaskBucketRepository>) -> Self {
        Self { task_buckets }
    }

    /// Returns the placement of a task in a view, if any.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::Repository`] when the lookup fails.
    pub async fn find(&self, task_id: TaskId, view_id: ViewId) -> KanbanResult<Option<TaskBucket>> {
        Ok(self.task_buckets.find(task_id, view_id).await?)
    }

    /// Places a task in a bucket, replacing its previous placement in the
    /// same view.
    ///
    /// The existing row is updated first; only when nothing was updated is a
    /// new row inserted. If another writer inserts between the two steps the
    /// uniqueness constraint rejects the insert and the conflict is reported
    /// instead of overwriting the winner.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::TaskAlreadyExistsInBucket`] when a concurrent
    /// writer placed the task first, or [`KanbanError::Repository`] for other
    /// storage failures.
    pub async fn upsert(&self, assignment: TaskBucket) -> KanbanResult<TaskBucket> {
        let updated = self
            .task_buckets
            .update_bucket(assignment.task_id, assignment.view_id, assignment.bucket_id)
            .await?;
        if updated > 0 {
            tracing::debug!(
                task_id = %assignment.task_id,
                view_id = %assignment.view_id,
                bucket_id = %assignment.bucket_id,
                "placement updated"
            );
            return Ok(assignment);
        }

        match self.task_buckets.insert(&assignment).await {
            Ok(()) => {
                tracing::debug!(
                    task_id = %assignment.task_id,
                    view_id = %assignment.view_id,
                    bucket_id = %assignment.bucket_id,
                    "placement inserted"
                );
                Ok(assignment)
            }
            Err(KanbanRepositoryError::DuplicateAssignment { task_id, view_id }) => {
                tracing::warn!(
                    task_id = %task_id,
                    view_id = %view_id,
                    "concurrent placement won the insert race"
                );
                Err(KanbanError::TaskAlreadyExistsInBucket { task_id, view_id })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Loads the buckets holding each task, restricted to views of
    /// `accessible_projects`.
    ///
    /// Every requested task has an entry; tasks without placements map to an
    /// empty list. An empty `task_ids` slice performs no storage call.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::Repository`] when the batch lookup fails.
    pub async fn add_buckets_to_tasks(
        &self,
        task_ids: &[TaskId],
        accessible_projects: &[ProjectId],
    ) -> KanbanResult<HashMap<TaskId, Vec<Bucket>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut buckets_by_task: HashMap<TaskId, Vec<Bucket>> =
            task_ids.iter().map(|task_id| (*task_id, Vec::new())).collect();
        let found = self
            .task_buckets
            .find_buckets_for_tasks(task_ids, accessible_projects)
            .await?;
        for (task_id, bucket) in found {
            buckets_by_task.entry(task_id).or_default().push(bucket);
        }
        Ok(buckets_by_task)
    }
}
