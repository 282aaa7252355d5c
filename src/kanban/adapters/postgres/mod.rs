//! `PostgreSQL` adapters for kanban persistence.

mod conversion;
mod models;
mod repository;
mod schema;

#[cfg(test)]
pub(crate) use conversion::{
    TASK_VIEW_UNIQUE_INDEX, bucket_reference, is_task_view_unique_violation, new_bucket_row,
    row_to_bucket, row_to_view,
};
#[cfg(test)]
pub(crate) use models::{BucketRow, ProjectViewRow};
pub use repository::{KanbanPgPool, PostgresBoardRepository};
