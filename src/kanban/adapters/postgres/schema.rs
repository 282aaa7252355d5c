//! Diesel schema for kanban persistence.

diesel::table! {
    /// Board columns.
    buckets (id) {
        /// Storage-assigned bucket identifier.
        id -> Int8,
        /// Owning project view.
        project_view_id -> Int8,
        /// Project owning the view.
        project_id -> Int8,
        /// Bucket title.
        #[max_length = 250]
        title -> Varchar,
        /// Work-in-progress limit; zero means unlimited.
        bucket_limit -> Int4,
        /// Ordering key within the view.
        position -> Float8,
        /// Signed creator identifier; negative for link shares.
        created_by_id -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project views, read by the engine.
    project_views (id) {
        /// View identifier.
        id -> Int8,
        /// Owning project; negative for saved-filter pseudo projects.
        project_id -> Int8,
        /// View title.
        #[max_length = 255]
        title -> Varchar,
        /// View kind.
        #[max_length = 20]
        view_kind -> Varchar,
        /// Bucket configuration mode.
        #[max_length = 20]
        bucket_configuration_mode -> Varchar,
        /// Saved filter expression.
        filter_expression -> Nullable<Text>,
        /// Fallback bucket for tasks of deleted buckets.
        default_bucket_id -> Nullable<Int8>,
        /// Bucket that marks tasks as done.
        done_bucket_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Placement of a task in one bucket per view.
    task_buckets (id) {
        /// Row identifier.
        id -> Int8,
        /// Placed task.
        task_id -> Int8,
        /// View of the placement.
        project_view_id -> Int8,
        /// Bucket holding the task.
        bucket_id -> Int8,
    }
}

diesel::joinable!(task_buckets -> buckets (bucket_id));
diesel::joinable!(buckets -> project_views (project_view_id));
diesel::allow_tables_to_appear_in_same_query!(buckets, project_views, task_buckets);
