//! Domain model for kanban bucket placement.
//!
//! Buckets, board views, task placements and the task scheduling fields the
//! engine touches. Everything here is pure; persistence and collaborators sit
//! behind the ports.

mod assignment;
mod bucket;
mod error;
mod event;
mod ids;
mod principal;
mod schedule;
mod task;
mod view;

pub use assignment::TaskBucket;
pub use bucket::{
    Bucket, BucketLimit, BucketTitle, NewBucket, PersistedBucketData, is_unset_position,
    validate_position,
};
pub use error::{KanbanDomainError, ParseBucketConfigurationModeError, ParseViewKindError};
pub use event::TaskUpdatedEvent;
pub use ids::{BucketId, LinkShareId, ProjectId, TaskId, UserId, ViewId};
pub use principal::{Identity, Permission, Principal, Profile};
pub use schedule::{Recurrence, RepeatMode, TaskSchedule};
pub use task::Task;
pub use view::{BoardView, BucketConfigurationMode, ClearedReferences, ViewKind};
