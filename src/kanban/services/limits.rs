//! Work-in-progress limit enforcement.

use super::{KanbanError, KanbanResult};
use crate::kanban::{
    domain::{BoardView, Bucket, TaskId},
    ports::{FilterQueryEngine, TaskBucketRepository},
};
use std::sync::Arc;

/// Computes bucket occupancy and refuses moves into full buckets.
#[derive(Clone)]
pub struct LimitEvaluator {
    task_buckets: Arc<dyn TaskBucketRepository>,
    filters: Arc<dyn FilterQueryEngine>,
}

impl LimitEvaluator {
    /// Creates an evaluator.
    #[must_use]
    pub const fn new(
        task_buckets: Arc<dyn TaskBucketRepository>,
        filters: Arc<dyn FilterQueryEngine>,
    ) -> Self {
        Self {
            task_buckets,
            filters,
        }
    }

    /// Returns how many tasks `bucket` holds, failing when `task_id` may not
    /// join it.
    ///
    /// Filter-derived views count through their saved query; manual boards
    /// count placement rows. Buckets already above their limit are left as
    /// they are.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::BucketLimitExceeded`] when the bucket is full,
    /// or the underlying storage or collaborator error.
    pub async fn check_limit(
        &self,
        view: &BoardView,
        task_id: TaskId,
        bucket: &Bucket,
    ) -> KanbanResult<u64> {
        let occupancy = if view.is_filter_derived() {
            self.filters.count_tasks(view, bucket.id()).await?
        } else {
            self.task_buckets.count_tasks_in_bucket(bucket.id()).await?
        };
        tracing::debug!(
            bucket_id = %bucket.id(),
            occupancy,
            limit = bucket.limit().value(),
            filter_derived = view.is_filter_derived(),
            "bucket occupancy counted"
        );

        if bucket.limit().admits(occupancy) {
            return Ok(occupancy);
        }
        tracing::warn!(
            task_id = %task_id,
            bucket_id = %bucket.id(),
            occupancy,
            limit = bucket.limit().value(),
            "bucket limit reached"
        );
        Err(KanbanError::BucketLimitExceeded {
            task_id,
            bucket_id: bucket.id(),
            limit: bucket.limit().value(),
        })
    }
}
