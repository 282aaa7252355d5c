//! Ports for the systems the board engine consumes but does not own.

use crate::kanban::domain::{
    BoardView, BucketId, Permission, Principal, Profile, ProjectId, Task, TaskId,
    TaskUpdatedEvent,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Answers project permission questions.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Returns `true` when `actor` holds `level` on `project_id`.
    async fn has_permission(
        &self,
        project_id: ProjectId,
        actor: &Principal,
        level: Permission,
    ) -> CollaboratorResult<bool>;
}

/// Loads tasks with their own access rules and stores schedule changes.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Loads a task the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGatewayError::Forbidden`] when the actor may not see the
    /// task and [`TaskGatewayError::NotFound`] when it does not exist.
    async fn get_by_id(&self, task_id: TaskId, actor: &Principal) -> Result<Task, TaskGatewayError>;

    /// Persists completion state and dates of a task.
    async fn save_schedule(&self, task: &Task) -> Result<(), TaskGatewayError>;
}

/// Resolves principals to profile data.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns profiles for the principals it knows; unknown ones are absent.
    async fn resolve(
        &self,
        principals: &[Principal],
    ) -> CollaboratorResult<HashMap<Principal, Profile>>;
}

/// Receives domain events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Hands an event to the delivery system.
    async fn dispatch(&self, event: &TaskUpdatedEvent) -> CollaboratorResult<()>;
}

/// Runs saved filter queries for filter-derived views.
#[async_trait]
pub trait FilterQueryEngine: Send + Sync {
    /// Counts the tasks the view's query places in `bucket_id`.
    async fn count_tasks(&self, view: &BoardView, bucket_id: BucketId) -> CollaboratorResult<u64>;
}

/// Keeps task reminders aligned with task schedules.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Recomputes reminders after the task's schedule or completion changed.
    async fn reschedule(&self, task: &Task) -> CollaboratorResult<()>;
}

/// Errors returned by the task gateway.
#[derive(Debug, Clone, Error)]
pub enum TaskGatewayError {
    /// The task does not exist.
    #[error("task {0} does not exist")]
    NotFound(TaskId),

    /// The actor may not access the task.
    #[error("access to task {task_id} denied for {actor}")]
    Forbidden {
        /// Requested task.
        task_id: TaskId,
        /// Refused principal.
        actor: Principal,
    },

    /// Gateway failure.
    #[error("task gateway error: {0}")]
    Failure(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskGatewayError {
    /// Wraps a gateway failure.
    pub fn failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failure(Arc::new(err))
    }
}

/// Failure of a collaborator other than the task gateway.
#[derive(Debug, Clone, Error)]
#[error("{collaborator} failed: {cause}")]
pub struct CollaboratorError {
    /// Name of the failing collaborator.
    pub collaborator: &'static str,
    /// Underlying failure.
    pub cause: Arc<dyn std::error::Error + Send + Sync>,
}

impl CollaboratorError {
    /// Wraps a failure reported by `collaborator`.
    pub fn new(
        collaborator: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            collaborator,
            cause: Arc::new(err),
        }
    }
}
