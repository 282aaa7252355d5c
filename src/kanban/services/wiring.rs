//! Port bundles injected into the board services.

use super::{KanbanError, KanbanResult};
use crate::kanban::{
    domain::{Permission, Principal, ProjectId},
    ports::{
        BucketRepository, EventSink, FilterQueryEngine, IdentityResolver, PermissionOracle,
        ReminderScheduler, TaskBucketRepository, TaskGateway, ViewRepository,
    },
};
use std::sync::Arc;

/// Storage ports for the tables the engine owns.
///
/// All three usually share one session-bound adapter.
#[derive(Clone)]
pub struct BoardStorage {
    /// Bucket rows.
    pub buckets: Arc<dyn BucketRepository>,
    /// Project view rows.
    pub views: Arc<dyn ViewRepository>,
    /// Task placement rows.
    pub task_buckets: Arc<dyn TaskBucketRepository>,
}

impl BoardStorage {
    /// Uses one adapter for all three storage ports.
    #[must_use]
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: BucketRepository + ViewRepository + TaskBucketRepository + 'static,
    {
        Self {
            buckets: repository.clone(),
            views: repository.clone(),
            task_buckets: repository,
        }
    }
}

/// External systems the engine consumes.
#[derive(Clone)]
pub struct Collaborators {
    /// Project permission checks.
    pub permissions: Arc<dyn PermissionOracle>,
    /// Task lookup and schedule persistence.
    pub tasks: Arc<dyn TaskGateway>,
    /// Creator profiles.
    pub identities: Arc<dyn IdentityResolver>,
    /// Domain event delivery.
    pub events: Arc<dyn EventSink>,
    /// Saved filter queries.
    pub filters: Arc<dyn FilterQueryEngine>,
    /// Reminder maintenance.
    pub reminders: Arc<dyn ReminderScheduler>,
}

/// Fails with [`KanbanError::AccessDenied`] unless `actor` holds `level` on
/// `project_id`.
pub(super) async fn ensure_permission(
    permissions: &dyn PermissionOracle,
    project_id: ProjectId,
    actor: &Principal,
    level: Permission,
) -> KanbanResult<()> {
    if permissions.has_permission(project_id, actor, level).await? {
        return Ok(());
    }
    tracing::warn!(
        project_id = %project_id,
        actor = %actor,
        level = level.as_str(),
        "permission refused"
    );
    Err(KanbanError::AccessDenied { project_id })
}
