//! Done-state handling for moves into and out of done buckets.

use super::{KanbanResult, TaskBucketStore};
use crate::kanban::{
    domain::{BoardView, BucketId, Task, TaskBucket},
    ports::{ReminderScheduler, TaskGateway, ViewRepository},
};
use mockable::Clock;
use std::sync::Arc;

/// Effect of a move on the task's completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneTransition {
    /// Completion state and schedule are untouched.
    Unchanged,
    /// The task entered a done bucket and is now done.
    Completed,
    /// The task left a done bucket and is open again.
    Reopened,
    /// A repeating task entered a done bucket; its schedule advanced and it
    /// stays open in its previous bucket.
    OccurrenceCompleted,
}

impl DoneTransition {
    /// Returns `true` when the task's schedule or completion changed.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Outcome of [`DoneStateSynchronizer::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct DoneSync {
    /// Task after the transition.
    pub task: Task,
    /// What happened to the task.
    pub transition: DoneTransition,
    /// Whether the move should still write the placement.
    pub write_assignment: bool,
    /// Bucket the task ends up in within the moved view; `None` when a
    /// vetoed task had no placement.
    pub target_bucket: Option<BucketId>,
    /// Placements written into sibling views' done buckets.
    pub propagated: Vec<TaskBucket>,
}

/// Applies done-bucket semantics to a move and keeps sibling boards in step.
#[derive(Clone)]
pub struct DoneStateSynchronizer<C>
where
    C: Clock + Send + Sync,
{
    views: Arc<dyn ViewRepository>,
    tasks: Arc<dyn TaskGateway>,
    reminders: Arc<dyn ReminderScheduler>,
    assignments: TaskBucketStore,
    repeat_catch_up: bool,
    clock: Arc<C>,
}

impl<C> DoneStateSynchronizer<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a synchronizer.
    #[must_use]
    pub const fn new(
        views: Arc<dyn ViewRepository>,
        tasks: Arc<dyn TaskGateway>,
        reminders: Arc<dyn ReminderScheduler>,
        assignments: TaskBucketStore,
        repeat_catch_up: bool,
        clock: Arc<C>,
    ) -> Self {
        Self {
            views,
            tasks,
            reminders,
            assignments,
            repeat_catch_up,
            clock,
        }
    }

    /// Works out what moving `task` from `old_bucket` to `new_bucket` in
    /// `view` does to its completion state, and applies it.
    ///
    /// When the state changes the task's schedule is saved and its reminders
    /// are recomputed. A task that became done is also placed into the done
    /// bucket of every other manual kanban view of the project. A failure
    /// partway through that propagation is returned; placements written
    /// before it remain.
    ///
    /// # Errors
    ///
    /// Returns the task gateway, reminder, view or placement error that
    /// stopped the sequence.
    pub async fn apply(
        &self,
        view: &BoardView,
        mut task: Task,
        old_bucket: Option<BucketId>,
        new_bucket: BucketId,
    ) -> KanbanResult<DoneSync> {
        let transition = self.transition(view, &mut task, old_bucket, new_bucket);

        let (write_assignment, target_bucket) = match transition {
            DoneTransition::OccurrenceCompleted => (false, old_bucket),
            _ => (true, Some(new_bucket)),
        };

        if !transition.is_change() {
            return Ok(DoneSync {
                task,
                transition,
                write_assignment,
                target_bucket,
                propagated: Vec::new(),
            });
        }

        self.tasks.save_schedule(&task).await?;
        self.reminders.reschedule(&task).await?;
        tracing::info!(
            task_id = %task.id(),
            view_id = %view.id(),
            transition = ?transition,
            done = task.done(),
            "task done state changed by move"
        );

        let propagated = if transition == DoneTransition::Completed {
            self.propagate_completion(view, &task).await?
        } else {
            Vec::new()
        };

        Ok(DoneSync {
            task,
            transition,
            write_assignment,
            target_bucket,
            propagated,
        })
    }

    fn transition(
        &self,
        view: &BoardView,
        task: &mut Task,
        old_bucket: Option<BucketId>,
        new_bucket: BucketId,
    ) -> DoneTransition {
        let now = self.clock.utc();
        if view.is_done_bucket(new_bucket) {
            if task.is_repeating() {
                task.complete_occurrence(now, self.repeat_catch_up);
                return DoneTransition::OccurrenceCompleted;
            }
            if task.mark_done(now) {
                return DoneTransition::Completed;
            }
            return DoneTransition::Unchanged;
        }

        let leaving_done = old_bucket.is_some_and(|old| view.is_done_bucket(old));
        if leaving_done && task.reopen() {
            return DoneTransition::Reopened;
        }
        DoneTransition::Unchanged
    }

    async fn propagate_completion(
        &self,
        origin: &BoardView,
        task: &Task,
    ) -> KanbanResult<Vec<TaskBucket>> {
        let siblings = self.views.list_for_project(origin.project_id()).await?;
        let mut propagated = Vec::new();
        for sibling in siblings
            .iter()
            .filter(|candidate| candidate.accepts_done_propagation(origin))
        {
            let Some(done_bucket) = sibling.done_bucket_id() else {
                continue;
            };
            let placement = self
                .assignments
                .upsert(TaskBucket::new(task.id(), sibling.id(), done_bucket))
                .await?;
            tracing::info!(
                task_id = %task.id(),
                view_id = %sibling.id(),
                bucket_id = %done_bucket,
                "completion propagated to sibling board"
            );
            propagated.push(placement);
        }
        Ok(propagated)
    }
}
