//! Board services orchestrating kanban domain operations.

mod assignments;
mod board;
mod buckets;
mod done_sync;
mod error;
mod limits;
mod wiring;

pub use assignments::TaskBucketStore;
pub use board::{BoardService, MoveOutcome, MoveTaskRequest, MovedTask};
pub use buckets::{
    BucketService, BucketWithCreator, CreateBucketRequest, DeletedBucket, UpdateBucketRequest,
};
pub use done_sync::{DoneStateSynchronizer, DoneSync, DoneTransition};
pub use error::{KanbanError, KanbanResult};
pub use limits::LimitEvaluator;
pub use wiring::{BoardStorage, Collaborators};
