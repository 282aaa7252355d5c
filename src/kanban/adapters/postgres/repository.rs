//! `PostgreSQL` repository implementation for kanban storage.

use super::{
    conversion::{
        is_task_view_unique_violation, limit_column, new_bucket_row, new_task_bucket_row,
        row_to_bucket, row_to_task_bucket, row_to_view, to_count,
    },
    models::{BucketRow, ProjectViewRow, TaskBucketRow},
    schema::{buckets, project_views, task_buckets},
};
use crate::kanban::{
    domain::{BoardView, Bucket, BucketId, NewBucket, ProjectId, TaskBucket, TaskId, ViewId},
    ports::{
        BucketRepository, KanbanRepositoryError, KanbanRepositoryResult, TaskBucketRepository,
        ViewRepository,
    },
};
use async_trait::async_trait;
use diesel::dsl;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by kanban adapters.
pub type KanbanPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed implementation of the three storage ports.
///
/// Every call checks a connection out of the pool and runs on the blocking
/// thread pool. Embedders that need one transaction across a whole engine
/// call should hand in a pool sized to a single connection inside that
/// transaction.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: KanbanPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: KanbanPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> KanbanRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> KanbanRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(KanbanRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(KanbanRepositoryError::persistence)?
    }
}

#[async_trait]
impl BucketRepository for PostgresBoardRepository {
    async fn insert(&self, draft: NewBucket) -> KanbanRepositoryResult<Bucket> {
        let row = new_bucket_row(&draft)?;
        self.run_blocking(move |connection| {
            let stored = diesel::insert_into(buckets::table)
                .values(&row)
                .returning(BucketRow::as_returning())
                .get_result::<BucketRow>(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            row_to_bucket(stored)
        })
        .await
    }

    async fn update(&self, bucket: &Bucket) -> KanbanRepositoryResult<()> {
        let bucket_id = bucket.id();
        let view_id = bucket.view_id().value();
        let title = bucket.title().as_str().to_owned();
        let limit = limit_column(bucket.limit())?;
        let position = bucket.position();
        let updated_at = bucket.updated_at();

        self.run_blocking(move |connection| {
            let updated = diesel::update(buckets::table.find(bucket_id.value()))
                .set((
                    buckets::project_view_id.eq(view_id),
                    buckets::title.eq(title),
                    buckets::bucket_limit.eq(limit),
                    buckets::position.eq(position),
                    buckets::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            if updated == 0 {
                return Err(KanbanRepositoryError::BucketNotFound(bucket_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, bucket_id: BucketId) -> KanbanRepositoryResult<Option<Bucket>> {
        self.run_blocking(move |connection| {
            buckets::table
                .find(bucket_id.value())
                .select(BucketRow::as_select())
                .first::<BucketRow>(connection)
                .optional()
                .map_err(KanbanRepositoryError::persistence)?
                .map(row_to_bucket)
                .transpose()
        })
        .await
    }

    async fn list_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<Vec<Bucket>> {
        self.run_blocking(move |connection| {
            let rows = buckets::table
                .filter(buckets::project_view_id.eq(view_id.value()))
                .order((buckets::position.asc(), buckets::id.asc()))
                .select(BucketRow::as_select())
                .load::<BucketRow>(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            rows.into_iter().map(row_to_bucket).collect()
        })
        .await
    }

    async fn count_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = buckets::table
                .filter(buckets::project_view_id.eq(view_id.value()))
                .count()
                .get_result(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            to_count(count)
        })
        .await
    }

    async fn delete(&self, bucket_id: BucketId) -> KanbanRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(buckets::table.find(bucket_id.value()))
                .execute(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(KanbanRepositoryError::BucketNotFound(bucket_id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ViewRepository for PostgresBoardRepository {
    async fn find_by_id(&self, view_id: ViewId) -> KanbanRepositoryResult<Option<BoardView>> {
        self.run_blocking(move |connection| {
            project_views::table
                .find(view_id.value())
                .select(ProjectViewRow::as_select())
                .first::<ProjectViewRow>(connection)
                .optional()
                .map_err(KanbanRepositoryError::persistence)?
                .map(row_to_view)
                .transpose()
        })
        .await
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> KanbanRepositoryResult<Vec<BoardView>> {
        self.run_blocking(move |connection| {
            let rows = project_views::table
                .filter(project_views::project_id.eq(project_id.value()))
                .order(project_views::id.asc())
                .select(ProjectViewRow::as_select())
                .load::<ProjectViewRow>(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            rows.into_iter().map(row_to_view).collect()
        })
        .await
    }

    async fn update_bucket_references(&self, view: &BoardView) -> KanbanRepositoryResult<()> {
        let view_id = view.id();
        let default_bucket = view.default_bucket_id().map(BucketId::value);
        let done_bucket = view.done_bucket_id().map(BucketId::value);

        self.run_blocking(move |connection| {
            let updated = diesel::update(project_views::table.find(view_id.value()))
                .set((
                    project_views::default_bucket_id.eq(default_bucket),
                    project_views::done_bucket_id.eq(done_bucket),
                ))
                .execute(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            if updated == 0 {
                return Err(KanbanRepositoryError::ViewNotFound(view_id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TaskBucketRepository for PostgresBoardRepository {
    async fn find(
        &self,
        task_id: TaskId,
        view_id: ViewId,
    ) -> KanbanRepositoryResult<Option<TaskBucket>> {
        self.run_blocking(move |connection| {
            let row = task_buckets::table
                .filter(task_buckets::task_id.eq(task_id.value()))
                .filter(task_buckets::project_view_id.eq(view_id.value()))
                .select(TaskBucketRow::as_select())
                .first::<TaskBucketRow>(connection)
                .optional()
                .map_err(KanbanRepositoryError::persistence)?;
            Ok(row.map(row_to_task_bucket))
        })
        .await
    }

    async fn update_bucket(
        &self,
        task_id: TaskId,
        view_id: ViewId,
        bucket_id: BucketId,
    ) -> KanbanRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                task_buckets::table
                    .filter(task_buckets::task_id.eq(task_id.value()))
                    .filter(task_buckets::project_view_id.eq(view_id.value())),
            )
            .set(task_buckets::bucket_id.eq(bucket_id.value()))
            .execute(connection)
            .map_err(KanbanRepositoryError::persistence)?;
            to_count(updated)
        })
        .await
    }

    async fn insert(&self, assignment: &TaskBucket) -> KanbanRepositoryResult<()> {
        let row = new_task_bucket_row(assignment);
        let task_id = assignment.task_id;
        let view_id = assignment.view_id;

        self.run_blocking(move |connection| {
            diesel::insert_into(task_buckets::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_task_view_unique_violation(info.as_ref()) =>
                    {
                        KanbanRepositoryError::DuplicateAssignment { task_id, view_id }
                    }
                    _ => KanbanRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn count_tasks_in_bucket(&self, bucket_id: BucketId) -> KanbanRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = task_buckets::table
                .filter(task_buckets::bucket_id.eq(bucket_id.value()))
                .select(dsl::count(task_buckets::task_id).aggregate_distinct())
                .get_result(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            to_count(count)
        })
        .await
    }

    async fn reassign_bucket(&self, from: BucketId, to: BucketId) -> KanbanRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let moved = diesel::update(
                task_buckets::table.filter(task_buckets::bucket_id.eq(from.value())),
            )
            .set(task_buckets::bucket_id.eq(to.value()))
            .execute(connection)
            .map_err(KanbanRepositoryError::persistence)?;
            to_count(moved)
        })
        .await
    }

    async fn list_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<Vec<TaskBucket>> {
        self.run_blocking(move |connection| {
            let rows = task_buckets::table
                .filter(task_buckets::project_view_id.eq(view_id.value()))
                .order(task_buckets::task_id.asc())
                .select(TaskBucketRow::as_select())
                .load::<TaskBucketRow>(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_task_bucket).collect())
        })
        .await
    }

    async fn find_buckets_for_tasks(
        &self,
        task_ids: &[TaskId],
        project_ids: &[ProjectId],
    ) -> KanbanRepositoryResult<Vec<(TaskId, Bucket)>> {
        let task_values: Vec<i64> = task_ids.iter().map(|id| id.value()).collect();
        let project_values: Vec<i64> = project_ids.iter().map(|id| id.value()).collect();

        self.run_blocking(move |connection| {
            let rows = task_buckets::table
                .inner_join(buckets::table)
                .inner_join(
                    project_views::table
                        .on(project_views::id.eq(task_buckets::project_view_id)),
                )
                .filter(task_buckets::task_id.eq_any(task_values))
                .filter(project_views::project_id.eq_any(project_values))
                .order((task_buckets::task_id.asc(), task_buckets::project_view_id.asc()))
                .select((task_buckets::task_id, BucketRow::as_select()))
                .load::<(i64, BucketRow)>(connection)
                .map_err(KanbanRepositoryError::persistence)?;
            rows.into_iter()
                .map(|(task_id, row)| Ok((TaskId::new(task_id), row_to_bucket(row)?)))
                .collect()
        })
        .await
    }
}
