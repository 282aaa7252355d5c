//! Diesel row models for kanban persistence.

use super::schema::{buckets, project_views, task_buckets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for buckets.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = buckets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BucketRow {
    /// Bucket identifier.
    pub id: i64,
    /// Owning project view.
    pub project_view_id: i64,
    /// Project owning the view.
    pub project_id: i64,
    /// Bucket title.
    pub title: String,
    /// Work-in-progress limit.
    pub bucket_limit: i32,
    /// Ordering key.
    pub position: f64,
    /// Signed creator identifier.
    pub created_by_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for buckets; the identifier is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = buckets)]
pub struct NewBucketRow {
    /// Owning project view.
    pub project_view_id: i64,
    /// Project owning the view.
    pub project_id: i64,
    /// Bucket title.
    pub title: String,
    /// Work-in-progress limit.
    pub bucket_limit: i32,
    /// Ordering key.
    pub position: f64,
    /// Signed creator identifier.
    pub created_by_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for project views.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_views)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectViewRow {
    /// View identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// View title.
    pub title: String,
    /// View kind.
    pub view_kind: String,
    /// Bucket configuration mode.
    pub bucket_configuration_mode: String,
    /// Saved filter expression.
    pub filter_expression: Option<String>,
    /// Default bucket reference.
    pub default_bucket_id: Option<i64>,
    /// Done bucket reference.
    pub done_bucket_id: Option<i64>,
}

/// Query result row for task placements.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = task_buckets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskBucketRow {
    /// Placed task.
    pub task_id: i64,
    /// View of the placement.
    pub project_view_id: i64,
    /// Bucket holding the task.
    pub bucket_id: i64,
}

/// Insert model for task placements.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = task_buckets)]
pub struct NewTaskBucketRow {
    /// Placed task.
    pub task_id: i64,
    /// View of the placement.
    pub project_view_id: i64,
    /// Bucket holding the task.
    pub bucket_id: i64,
}
