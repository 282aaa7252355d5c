//! Port contracts for kanban bucket placement.
//!
//! Storage ports cover the three tables the engine owns; collaborator ports
//! cover the systems it consumes (permissions, tasks, identities, events,
//! filters, reminders).

mod collaborators;
mod repository;

pub use collaborators::{
    CollaboratorError, CollaboratorResult, EventSink, FilterQueryEngine, IdentityResolver,
    PermissionOracle, ReminderScheduler, TaskGateway, TaskGatewayError,
};
pub use repository::{
    BucketRepository, KanbanRepositoryError, KanbanRepositoryResult, TaskBucketRepository,
    ViewRepository,
};
