//! In-memory adapters for every kanban port.

mod board;
mod collaborators;

pub use board::InMemoryBoardRepository;
pub use collaborators::{
    InMemoryIdentityDirectory, InMemoryPermissionOracle, InMemoryTaskDirectory,
    RecordingEventSink, RecordingReminderScheduler, StaticFilterQueryEngine,
};
