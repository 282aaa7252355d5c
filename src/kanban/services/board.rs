//! Public entry points sequencing the board components.

use super::{
    BoardStorage, BucketService, BucketWithCreator, Collaborators, CreateBucketRequest,
    DeletedBucket, DoneStateSynchronizer, DoneTransition, KanbanError, KanbanResult,
    LimitEvaluator, TaskBucketStore, UpdateBucketRequest, wiring::ensure_permission,
};
use crate::config::KanbanConfig;
use crate::kanban::{
    domain::{
        BoardView, Bucket, BucketId, Permission, Principal, ProjectId, Task, TaskBucket, TaskId,
        TaskUpdatedEvent, ViewId,
    },
    ports::{EventSink, PermissionOracle, TaskGateway},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Request to place a task in a bucket of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTaskRequest {
    /// Task to move.
    pub task_id: TaskId,
    /// View the move happens in.
    pub view_id: ViewId,
    /// Target bucket.
    pub bucket_id: BucketId,
}

impl MoveTaskRequest {
    /// Creates a move request.
    #[must_use]
    pub const fn new(task_id: TaskId, view_id: ViewId, bucket_id: BucketId) -> Self {
        Self {
            task_id,
            view_id,
            bucket_id,
        }
    }
}

/// Details of a move that ran through the full sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MovedTask {
    /// Task state after the move.
    pub task: Task,
    /// View the move happened in.
    pub view_id: ViewId,
    /// Bucket the caller asked for.
    pub requested_bucket: BucketId,
    /// Placement in the view after the move; `None` when a vetoed task had
    /// none before.
    pub assignment: Option<TaskBucket>,
    /// Tasks in the requested bucket before the move.
    pub occupancy: u64,
    /// Effect on the task's completion state.
    pub transition: DoneTransition,
    /// Whether the placement was written.
    pub assignment_written: bool,
    /// Placements written into sibling views' done buckets.
    pub propagated: Vec<TaskBucket>,
}

/// Result of [`BoardService::move_task_to_bucket`].
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The task already sat in the requested bucket; nothing was checked or
    /// written and no event was sent.
    Unchanged {
        /// The existing placement.
        assignment: TaskBucket,
    },
    /// The move ran.
    Moved(Box<MovedTask>),
}

impl MoveOutcome {
    /// Returns the placement after the call, if the task has one.
    #[must_use]
    pub fn assignment(&self) -> Option<TaskBucket> {
        match self {
            Self::Unchanged { assignment } => Some(*assignment),
            Self::Moved(moved) => moved.assignment,
        }
    }
}

/// Board orchestration service.
#[derive(Clone)]
pub struct BoardService<C>
where
    C: Clock + Send + Sync,
{
    storage: BoardStorage,
    permissions: Arc<dyn PermissionOracle>,
    tasks: Arc<dyn TaskGateway>,
    events: Arc<dyn EventSink>,
    buckets: BucketService<C>,
    assignments: TaskBucketStore,
    limits: LimitEvaluator,
    done_sync: DoneStateSynchronizer<C>,
    clock: Arc<C>,
}

impl<C> BoardService<C>
where
    C: Clock + Send + Sync,
{
    /// Wires the board components over the given ports.
    #[must_use]
    pub fn new(
        storage: BoardStorage,
        collaborators: Collaborators,
        config: &KanbanConfig,
        clock: Arc<C>,
    ) -> Self {
        let assignments = TaskBucketStore::new(storage.task_buckets.clone());
        let limits = LimitEvaluator::new(
            storage.task_buckets.clone(),
            collaborators.filters.clone(),
        );
        let done_sync = DoneStateSynchronizer::new(
            storage.views.clone(),
            collaborators.tasks.clone(),
            collaborators.reminders.clone(),
            assignments.clone(),
            config.repeat_catch_up,
            clock.clone(),
        );
        let buckets = BucketService::new(
            storage.clone(),
            collaborators.permissions.clone(),
            collaborators.identities.clone(),
            config,
            clock.clone(),
        );
        Self {
            storage,
            permissions: collaborators.permissions,
            tasks: collaborators.tasks,
            events: collaborators.events,
            buckets,
            assignments,
            limits,
            done_sync,
            clock,
        }
    }

    /// Returns the bucket service.
    #[must_use]
    pub const fn buckets(&self) -> &BucketService<C> {
        &self.buckets
    }

    /// Returns the placement store.
    #[must_use]
    pub const fn assignments(&self) -> &TaskBucketStore {
        &self.assignments
    }

    /// Returns the limit evaluator.
    #[must_use]
    pub const fn limits(&self) -> &LimitEvaluator {
        &self.limits
    }

    /// Returns the done-state synchronizer.
    #[must_use]
    pub const fn done_sync(&self) -> &DoneStateSynchronizer<C> {
        &self.done_sync
    }

    /// Moves a task into a bucket of a view.
    ///
    /// Asking for the bucket the task already occupies returns
    /// [`MoveOutcome::Unchanged`] without checks, writes or events. Otherwise
    /// the bucket must belong to the view and the actor must see the task.
    /// The task must belong to the view's project unless the view sits on a
    /// saved-filter pseudo project. The actor needs write permission on the
    /// view's project, and the bucket must have room. Done-bucket semantics
    /// are applied before the placement is written, and a
    /// [`TaskUpdatedEvent`] is dispatched last.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ViewDoesNotExist`],
    /// [`KanbanError::BucketDoesNotExist`],
    /// [`KanbanError::BucketDoesNotBelongToProjectView`],
    /// [`KanbanError::Task`] from the task gateway,
    /// [`KanbanError::TaskOutsideProject`], [`KanbanError::AccessDenied`],
    /// [`KanbanError::BucketLimitExceeded`],
    /// [`KanbanError::TaskAlreadyExistsInBucket`], or storage and
    /// collaborator failures.
    pub async fn move_task_to_bucket(
        &self,
        actor: &Principal,
        request: MoveTaskRequest,
    ) -> KanbanResult<MoveOutcome> {
        let existing = self
            .assignments
            .find(request.task_id, request.view_id)
            .await?;
        if let Some(assignment) = existing
            && assignment.bucket_id == request.bucket_id
        {
            tracing::debug!(
                task_id = %request.task_id,
                view_id = %request.view_id,
                bucket_id = %request.bucket_id,
                "task already in requested bucket"
            );
            return Ok(MoveOutcome::Unchanged { assignment });
        }

        let view = self.load_view(request.view_id).await?;
        let bucket = self.load_bucket(request.bucket_id).await?;
        if bucket.view_id() != view.id() {
            return Err(KanbanError::BucketDoesNotBelongToProjectView {
                view_id: view.id(),
                bucket_id: bucket.id(),
            });
        }

        let task = self.tasks.get_by_id(request.task_id, actor).await?;
        if !view.project_id().is_pseudo() && task.project_id() != view.project_id() {
            tracing::warn!(
                task_id = %task.id(),
                task_project = %task.project_id(),
                view_project = %view.project_id(),
                "task refused by board of another project"
            );
            return Err(KanbanError::TaskOutsideProject {
                task_id: task.id(),
                project_id: view.project_id(),
            });
        }
        ensure_permission(&*self.permissions, view.project_id(), actor, Permission::Write).await?;
        let occupancy = self.limits.check_limit(&view, task.id(), &bucket).await?;

        let old_bucket = existing.map(|assignment| assignment.bucket_id);
        let sync = self
            .done_sync
            .apply(&view, task, old_bucket, bucket.id())
            .await?;

        let assignment = match sync.target_bucket {
            Some(target) if sync.write_assignment => Some(
                self.assignments
                    .upsert(TaskBucket::new(request.task_id, view.id(), target))
                    .await?,
            ),
            _ => existing,
        };

        let event = TaskUpdatedEvent::new(sync.task.clone(), *actor, &*self.clock);
        self.events.dispatch(&event).await?;
        tracing::info!(
            task_id = %request.task_id,
            view_id = %view.id(),
            bucket_id = %bucket.id(),
            actor = %actor,
            transition = ?sync.transition,
            assignment_written = sync.write_assignment,
            "task moved"
        );

        Ok(MoveOutcome::Moved(Box::new(MovedTask {
            task: sync.task,
            view_id: view.id(),
            requested_bucket: bucket.id(),
            assignment,
            occupancy,
            transition: sync.transition,
            assignment_written: sync.write_assignment,
            propagated: sync.propagated,
        })))
    }

    /// Creates a bucket in a view.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ViewDoesNotExist`] for an unknown view, or the
    /// errors of [`BucketService::create`].
    pub async fn create_bucket(
        &self,
        actor: &Principal,
        view_id: ViewId,
        request: CreateBucketRequest,
    ) -> KanbanResult<BucketWithCreator> {
        let view = self.load_view(view_id).await?;
        self.buckets.create(actor, &view, request).await
    }

    /// Replaces a bucket's title, limit and position.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ViewDoesNotExist`] for an unknown view, or the
    /// errors of [`BucketService::update`].
    pub async fn update_bucket(
        &self,
        actor: &Principal,
        view_id: ViewId,
        request: UpdateBucketRequest,
    ) -> KanbanResult<Bucket> {
        let view = self.load_view(view_id).await?;
        self.buckets.update(actor, &view, request).await
    }

    /// Deletes a bucket from a view of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ViewDoesNotExist`] when the view is unknown or
    /// belongs to another project, or the errors of
    /// [`BucketService::delete`].
    pub async fn delete_bucket(
        &self,
        actor: &Principal,
        project_id: ProjectId,
        view_id: ViewId,
        bucket_id: BucketId,
    ) -> KanbanResult<DeletedBucket> {
        let view = self.load_view(view_id).await?;
        if view.project_id() != project_id {
            return Err(KanbanError::ViewDoesNotExist(view_id));
        }
        self.buckets.delete(actor, &view, bucket_id).await
    }

    /// Lists a view's buckets by position with their creators.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ViewDoesNotExist`] for an unknown view, or the
    /// errors of [`BucketService::list_for_view`].
    pub async fn get_all_buckets(
        &self,
        actor: &Principal,
        view_id: ViewId,
    ) -> KanbanResult<Vec<BucketWithCreator>> {
        let view = self.load_view(view_id).await?;
        self.buckets.list_for_view(actor, &view).await
    }

    /// Loads the buckets holding each task across the accessible projects.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::Repository`] when the lookup fails.
    pub async fn add_buckets_to_tasks(
        &self,
        task_ids: &[TaskId],
        accessible_projects: &[ProjectId],
    ) -> KanbanResult<HashMap<TaskId, Vec<Bucket>>> {
        self.assignments
            .add_buckets_to_tasks(task_ids, accessible_projects)
            .await
    }

    async fn load_view(&self, view_id: ViewId) -> KanbanResult<BoardView> {
        self.storage
            .views
            .find_by_id(view_id)
            .await?
            .ok_or(KanbanError::ViewDoesNotExist(view_id))
    }

    async fn load_bucket(&self, bucket_id: BucketId) -> KanbanResult<Bucket> {
        self.storage
            .buckets
            .find_by_id(bucket_id)
            .await?
            .ok_or(KanbanError::BucketDoesNotExist(bucket_id))
    }
}
