//! In-memory collaborators for tests and embedders without external systems.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::kanban::{
    domain::{
        BoardView, BucketId, Permission, Principal, Profile, ProjectId, Task, TaskId,
        TaskUpdatedEvent,
    },
    ports::{
        CollaboratorError, CollaboratorResult, EventSink, FilterQueryEngine, IdentityResolver,
        PermissionOracle, ReminderScheduler, TaskGateway, TaskGatewayError,
    },
};

fn poisoned(collaborator: &'static str, err: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::new(collaborator, std::io::Error::other(err.to_string()))
}

/// Permission oracle backed by an explicit grant list.
///
/// A write grant implies read.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPermissionOracle {
    grants: Arc<RwLock<HashSet<(ProjectId, Principal, Permission)>>>,
}

impl InMemoryPermissionOracle {
    /// Creates an oracle that refuses everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `level` on `project_id` to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the grant table lock is poisoned.
    pub fn grant(
        &self,
        project_id: ProjectId,
        actor: Principal,
        level: Permission,
    ) -> CollaboratorResult<()> {
        let mut grants = self
            .grants
            .write()
            .map_err(|err| poisoned("permission oracle", err))?;
        grants.insert((project_id, actor, level));
        Ok(())
    }
}

#[async_trait]
impl PermissionOracle for InMemoryPermissionOracle {
    async fn has_permission(
        &self,
        project_id: ProjectId,
        actor: &Principal,
        level: Permission,
    ) -> CollaboratorResult<bool> {
        let grants = self
            .grants
            .read()
            .map_err(|err| poisoned("permission oracle", err))?;
        let granted = grants.contains(&(project_id, *actor, level))
            || (level == Permission::Read
                && grants.contains(&(project_id, *actor, Permission::Write)));
        Ok(granted)
    }
}

#[derive(Debug, Default)]
struct TaskDirectoryState {
    tasks: HashMap<TaskId, Task>,
    readers: HashSet<(ProjectId, Principal)>,
}

/// Task gateway over an in-memory task table.
///
/// A principal may load a task when it was granted access to the task's
/// project.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskDirectory {
    state: Arc<RwLock<TaskDirectoryState>>,
}

impl InMemoryTaskDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGatewayError::Failure`] when the lock is poisoned.
    pub fn insert(&self, task: Task) -> Result<(), TaskGatewayError> {
        let mut state = self.write()?;
        state.tasks.insert(task.id(), task);
        Ok(())
    }

    /// Lets `actor` load tasks of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGatewayError::Failure`] when the lock is poisoned.
    pub fn allow(&self, project_id: ProjectId, actor: Principal) -> Result<(), TaskGatewayError> {
        let mut state = self.write()?;
        state.readers.insert((project_id, actor));
        Ok(())
    }

    /// Returns the stored task without an access check.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGatewayError::NotFound`] for unknown tasks.
    pub fn stored(&self, task_id: TaskId) -> Result<Task, TaskGatewayError> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskGatewayError::failure(std::io::Error::other(err.to_string())))?;
        state
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or(TaskGatewayError::NotFound(task_id))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, TaskDirectoryState>, TaskGatewayError> {
        self.state
            .write()
            .map_err(|err| TaskGatewayError::failure(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TaskGateway for InMemoryTaskDirectory {
    async fn get_by_id(&self, task_id: TaskId, actor: &Principal) -> Result<Task, TaskGatewayError> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskGatewayError::failure(std::io::Error::other(err.to_string())))?;
        let task = state
            .tasks
            .get(&task_id)
            .ok_or(TaskGatewayError::NotFound(task_id))?;
        if !state.readers.contains(&(task.project_id(), *actor)) {
            return Err(TaskGatewayError::Forbidden {
                task_id,
                actor: *actor,
            });
        }
        Ok(task.clone())
    }

    async fn save_schedule(&self, task: &Task) -> Result<(), TaskGatewayError> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskGatewayError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }
}

/// Identity resolver over a fixed profile table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    profiles: Arc<RwLock<HashMap<Principal, Profile>>>,
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile for `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the lock is poisoned.
    pub fn register(&self, principal: Principal, profile: Profile) -> CollaboratorResult<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|err| poisoned("identity resolver", err))?;
        profiles.insert(principal, profile);
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityDirectory {
    async fn resolve(
        &self,
        principals: &[Principal],
    ) -> CollaboratorResult<HashMap<Principal, Profile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|err| poisoned("identity resolver", err))?;
        Ok(principals
            .iter()
            .filter_map(|principal| {
                profiles
                    .get(principal)
                    .map(|profile| (*principal, profile.clone()))
            })
            .collect())
    }
}

/// Event sink that keeps every dispatched event.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<RwLock<Vec<TaskUpdatedEvent>>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events dispatched so far.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the lock is poisoned.
    pub fn events(&self) -> CollaboratorResult<Vec<TaskUpdatedEvent>> {
        let events = self
            .events
            .read()
            .map_err(|err| poisoned("event sink", err))?;
        Ok(events.clone())
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn dispatch(&self, event: &TaskUpdatedEvent) -> CollaboratorResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|err| poisoned("event sink", err))?;
        events.push(event.clone());
        Ok(())
    }
}

/// Reminder scheduler that records which tasks were rescheduled.
#[derive(Debug, Clone, Default)]
pub struct RecordingReminderScheduler {
    rescheduled: Arc<RwLock<Vec<Task>>>,
}

impl RecordingReminderScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the task states passed to [`ReminderScheduler::reschedule`].
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the lock is poisoned.
    pub fn rescheduled(&self) -> CollaboratorResult<Vec<Task>> {
        let rescheduled = self
            .rescheduled
            .read()
            .map_err(|err| poisoned("reminder scheduler", err))?;
        Ok(rescheduled.clone())
    }
}

#[async_trait]
impl ReminderScheduler for RecordingReminderScheduler {
    async fn reschedule(&self, task: &Task) -> CollaboratorResult<()> {
        let mut rescheduled = self
            .rescheduled
            .write()
            .map_err(|err| poisoned("reminder scheduler", err))?;
        rescheduled.push(task.clone());
        Ok(())
    }
}

/// Filter query engine answering from preset per-bucket counts.
///
/// Buckets without a preset count hold no tasks.
#[derive(Debug, Clone, Default)]
pub struct StaticFilterQueryEngine {
    counts: Arc<RwLock<HashMap<BucketId, u64>>>,
}

impl StaticFilterQueryEngine {
    /// Creates an engine where every bucket is empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many tasks the saved query places in `bucket_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the lock is poisoned.
    pub fn set_count(&self, bucket_id: BucketId, count: u64) -> CollaboratorResult<()> {
        let mut counts = self
            .counts
            .write()
            .map_err(|err| poisoned("filter query engine", err))?;
        counts.insert(bucket_id, count);
        Ok(())
    }
}

#[async_trait]
impl FilterQueryEngine for StaticFilterQueryEngine {
    async fn count_tasks(&self, _view: &BoardView, bucket_id: BucketId) -> CollaboratorResult<u64> {
        let counts = self
            .counts
            .read()
            .map_err(|err| poisoned("filter query engine", err))?;
        Ok(counts.get(&bucket_id).copied().unwrap_or_default())
    }
}
