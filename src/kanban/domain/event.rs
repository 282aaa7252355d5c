//! Domain events emitted by the board engine.

use super::{Principal, Task};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted after a task was moved between buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdatedEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Task state after the move.
    pub task: Task,
    /// Principal that performed the move.
    pub doer: Principal,
    /// When the move happened.
    pub occurred_at: DateTime<Utc>,
}

impl TaskUpdatedEvent {
    /// Creates an event stamped with the clock's current time.
    #[must_use]
    pub fn new(task: Task, doer: Principal, clock: &impl Clock) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            task,
            doer,
            occurred_at: clock.utc(),
        }
    }
}
