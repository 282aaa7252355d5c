//! The task fields the board engine reads and writes.
//!
//! Tasks are owned by the task collaborator; this view of them only carries
//! completion and scheduling state.

use super::{ProjectId, Recurrence, TaskId, TaskSchedule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task as seen by the board engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    done: bool,
    done_at: Option<DateTime<Utc>>,
    schedule: TaskSchedule,
    recurrence: Recurrence,
}

impl Task {
    /// Creates an open, non-repeating task without dates.
    #[must_use]
    pub fn new(id: TaskId, project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            done: false,
            done_at: None,
            schedule: TaskSchedule::default(),
            recurrence: Recurrence::NONE,
        }
    }

    /// Sets the schedule.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: TaskSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the recurrence rule.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Marks the task as completed at `done_at`.
    #[must_use]
    pub const fn completed_at(mut self, done_at: DateTime<Utc>) -> Self {
        self.done = true;
        self.done_at = Some(done_at);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns `true` when the task is completed.
    #[must_use]
    pub const fn done(&self) -> bool {
        self.done
    }

    /// Returns the completion timestamp; `None` while open.
    #[must_use]
    pub const fn done_at(&self) -> Option<DateTime<Utc>> {
        self.done_at
    }

    /// Returns the schedule.
    #[must_use]
    pub const fn schedule(&self) -> &TaskSchedule {
        &self.schedule
    }

    /// Returns the recurrence rule.
    #[must_use]
    pub const fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Returns `true` when completing the task schedules a new occurrence.
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.recurrence.is_repeating()
    }

    /// Completes the task. Returns `false` when it was already done.
    pub const fn mark_done(&mut self, now: DateTime<Utc>) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        self.done_at = Some(now);
        true
    }

    /// Reopens the task. Returns `false` when it was already open.
    pub const fn reopen(&mut self) -> bool {
        if !self.done {
            return false;
        }
        self.done = false;
        self.done_at = None;
        true
    }

    /// Completes the current occurrence of a repeating task.
    ///
    /// The schedule moves to the next occurrence and the task stays open.
    pub fn complete_occurrence(&mut self, now: DateTime<Utc>, catch_up: bool) {
        self.schedule = self
            .schedule
            .next_occurrence(self.recurrence, now, catch_up);
        self.done = false;
        self.done_at = None;
    }
}
