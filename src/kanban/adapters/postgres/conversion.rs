//! Conversions between kanban rows and domain types.

use super::models::{BucketRow, NewBucketRow, NewTaskBucketRow, ProjectViewRow, TaskBucketRow};
use crate::kanban::{
    domain::{
        BoardView, Bucket, BucketConfigurationMode, BucketId, BucketLimit, BucketTitle, NewBucket,
        PersistedBucketData, Principal, ProjectId, TaskBucket, TaskId, ViewId, ViewKind,
    },
    ports::{KanbanRepositoryError, KanbanRepositoryResult},
};
use diesel::result::DatabaseErrorInformation;

/// Name of the unique index on `(task_id, project_view_id)`.
pub(crate) const TASK_VIEW_UNIQUE_INDEX: &str = "idx_task_buckets_task_view";

/// Rebuilds a bucket from its row.
///
/// # Errors
///
/// Returns [`KanbanRepositoryError::InvalidPersistedData`] when the title,
/// limit or creator column holds a value the domain rejects.
pub(crate) fn row_to_bucket(row: BucketRow) -> KanbanRepositoryResult<Bucket> {
    let title = BucketTitle::new(row.title).map_err(KanbanRepositoryError::invalid_persisted_data)?;
    let raw_limit =
        u32::try_from(row.bucket_limit).map_err(KanbanRepositoryError::invalid_persisted_data)?;
    let limit = BucketLimit::new(raw_limit).map_err(KanbanRepositoryError::invalid_persisted_data)?;
    let created_by = Principal::from_storage_id(row.created_by_id)
        .map_err(KanbanRepositoryError::invalid_persisted_data)?;

    Ok(Bucket::from_persisted(PersistedBucketData {
        id: BucketId::new(row.id),
        view_id: ViewId::new(row.project_view_id),
        project_id: ProjectId::new(row.project_id),
        title,
        position: row.position,
        limit,
        created_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

/// Builds the insert row for a new bucket.
///
/// # Errors
///
/// Returns [`KanbanRepositoryError::Persistence`] when the limit does not fit
/// the column.
pub(crate) fn new_bucket_row(draft: &NewBucket) -> KanbanRepositoryResult<NewBucketRow> {
    Ok(NewBucketRow {
        project_view_id: draft.view_id.value(),
        project_id: draft.project_id.value(),
        title: draft.title.as_str().to_owned(),
        bucket_limit: limit_column(draft.limit)?,
        position: draft.position,
        created_by_id: draft.created_by.storage_id(),
        created_at: draft.created_at,
        updated_at: draft.created_at,
    })
}

/// Converts a limit to its column value.
///
/// # Errors
///
/// Returns [`KanbanRepositoryError::Persistence`] when the limit does not fit
/// an `INTEGER`.
pub(crate) fn limit_column(limit: BucketLimit) -> KanbanRepositoryResult<i32> {
    i32::try_from(limit.value()).map_err(KanbanRepositoryError::persistence)
}

/// Rebuilds a view from its row.
///
/// # Errors
///
/// Returns [`KanbanRepositoryError::InvalidPersistedData`] for unknown kind
/// or configuration mode strings.
pub(crate) fn row_to_view(row: ProjectViewRow) -> KanbanRepositoryResult<BoardView> {
    let kind = ViewKind::try_from(row.view_kind.as_str())
        .map_err(KanbanRepositoryError::invalid_persisted_data)?;
    let mode = BucketConfigurationMode::try_from(row.bucket_configuration_mode.as_str())
        .map_err(KanbanRepositoryError::invalid_persisted_data)?;

    let view = BoardView::new(
        ViewId::new(row.id),
        ProjectId::new(row.project_id),
        row.title,
        kind,
    )
    .with_bucket_configuration_mode(mode)
    .with_bucket_references(
        bucket_reference(row.default_bucket_id),
        bucket_reference(row.done_bucket_id),
    );
    Ok(match row.filter_expression {
        Some(filter) => view.with_filter(filter),
        None => view,
    })
}

/// Maps a nullable reference column; zero is treated as unset.
pub(crate) fn bucket_reference(value: Option<i64>) -> Option<BucketId> {
    value.filter(|id| *id != 0).map(BucketId::new)
}

/// Rebuilds a placement from its row.
pub(crate) const fn row_to_task_bucket(row: TaskBucketRow) -> TaskBucket {
    TaskBucket::new(
        TaskId::new(row.task_id),
        ViewId::new(row.project_view_id),
        BucketId::new(row.bucket_id),
    )
}

/// Builds the insert row for a placement.
pub(crate) const fn new_task_bucket_row(assignment: &TaskBucket) -> NewTaskBucketRow {
    NewTaskBucketRow {
        task_id: assignment.task_id.value(),
        project_view_id: assignment.view_id.value(),
        bucket_id: assignment.bucket_id.value(),
    }
}

/// Returns `true` when a unique violation came from the placement index.
pub(crate) fn is_task_view_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TASK_VIEW_UNIQUE_INDEX)
}

/// Converts an affected-row or count value to `u64`.
///
/// # Errors
///
/// Returns [`KanbanRepositoryError::Persistence`] for values that do not fit.
pub(crate) fn to_count<T>(value: T) -> KanbanRepositoryResult<u64>
where
    u64: TryFrom<T>,
    <u64 as TryFrom<T>>::Error: std::error::Error + Send + Sync + 'static,
{
    u64::try_from(value).map_err(KanbanRepositoryError::persistence)
}
