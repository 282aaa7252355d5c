//! Task placement within a board view.

use super::{BucketId, TaskId, ViewId};
use serde::{Deserialize, Serialize};

/// Placement of one task in one view.
///
/// `(task_id, view_id)` is unique: a task sits in at most one bucket per
/// view, but may sit in different buckets of different views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskBucket {
    /// Placed task.
    pub task_id: TaskId,
    /// View the placement applies to.
    pub view_id: ViewId,
    /// Bucket holding the task in that view.
    pub bucket_id: BucketId,
}

impl TaskBucket {
    /// Creates a placement.
    #[must_use]
    pub const fn new(task_id: TaskId, view_id: ViewId, bucket_id: BucketId) -> Self {
        Self {
            task_id,
            view_id,
            bucket_id,
        }
    }
}
