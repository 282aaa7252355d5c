//! In-memory storage for buckets, views and task placements.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::kanban::{
    domain::{BoardView, Bucket, BucketId, NewBucket, ProjectId, TaskBucket, TaskId, ViewId},
    ports::{
        BucketRepository, KanbanRepositoryError, KanbanRepositoryResult, TaskBucketRepository,
        ViewRepository,
    },
};

/// Thread-safe in-memory implementation of the three storage ports.
///
/// Placements are keyed by `(task, view)`, so inserting a second placement
/// for the same pair fails exactly like the relational unique index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    buckets: BTreeMap<BucketId, Bucket>,
    views: BTreeMap<ViewId, BoardView>,
    placements: HashMap<(TaskId, ViewId), BucketId>,
    last_bucket_id: i64,
}

impl InMemoryBoardRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a view.
    ///
    /// Views are owned by another subsystem; this seeds them for the engine.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn insert_view(&self, view: BoardView) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        state.views.insert(view.id(), view);
        Ok(())
    }

    fn read(&self) -> KanbanRepositoryResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            KanbanRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> KanbanRepositoryResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            KanbanRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn sorted_by_position(mut buckets: Vec<Bucket>) -> Vec<Bucket> {
    buckets.sort_by(|left, right| {
        left.position()
            .total_cmp(&right.position())
            .then_with(|| left.id().cmp(&right.id()))
    });
    buckets
}

fn to_count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[async_trait]
impl BucketRepository for InMemoryBoardRepository {
    async fn insert(&self, draft: NewBucket) -> KanbanRepositoryResult<Bucket> {
        let mut state = self.write()?;
        state.last_bucket_id = state.last_bucket_id.saturating_add(1);
        let bucket = Bucket::from_new(BucketId::new(state.last_bucket_id), draft);
        state.buckets.insert(bucket.id(), bucket.clone());
        Ok(bucket)
    }

    async fn update(&self, bucket: &Bucket) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .buckets
            .get_mut(&bucket.id())
            .ok_or(KanbanRepositoryError::BucketNotFound(bucket.id()))?;
        *stored = bucket.clone();
        Ok(())
    }

    async fn find_by_id(&self, bucket_id: BucketId) -> KanbanRepositoryResult<Option<Bucket>> {
        let state = self.read()?;
        Ok(state.buckets.get(&bucket_id).cloned())
    }

    async fn list_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<Vec<Bucket>> {
        let state = self.read()?;
        let buckets = state
            .buckets
            .values()
            .filter(|bucket| bucket.view_id() == view_id)
            .cloned()
            .collect();
        Ok(sorted_by_position(buckets))
    }

    async fn count_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<u64> {
        let state = self.read()?;
        let count = state
            .buckets
            .values()
            .filter(|bucket| bucket.view_id() == view_id)
            .count();
        Ok(to_count(count))
    }

    async fn delete(&self, bucket_id: BucketId) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .buckets
            .remove(&bucket_id)
            .map(|_| ())
            .ok_or(KanbanRepositoryError::BucketNotFound(bucket_id))
    }
}

#[async_trait]
impl ViewRepository for InMemoryBoardRepository {
    async fn find_by_id(&self, view_id: ViewId) -> KanbanRepositoryResult<Option<BoardView>> {
        let state = self.read()?;
        Ok(state.views.get(&view_id).cloned())
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> KanbanRepositoryResult<Vec<BoardView>> {
        let state = self.read()?;
        Ok(state
            .views
            .values()
            .filter(|view| view.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn update_bucket_references(&self, view: &BoardView) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .views
            .get_mut(&view.id())
            .ok_or(KanbanRepositoryError::ViewNotFound(view.id()))?;
        *stored = stored
            .clone()
            .with_bucket_references(view.default_bucket_id(), view.done_bucket_id());
        Ok(())
    }
}

#[async_trait]
impl TaskBucketRepository for InMemoryBoardRepository {
    async fn find(
        &self,
        task_id: TaskId,
        view_id: ViewId,
    ) -> KanbanRepositoryResult<Option<TaskBucket>> {
        let state = self.read()?;
        Ok(state
            .placements
            .get(&(task_id, view_id))
            .map(|bucket_id| TaskBucket::new(task_id, view_id, *bucket_id)))
    }

    async fn update_bucket(
        &self,
        task_id: TaskId,
        view_id: ViewId,
        bucket_id: BucketId,
    ) -> KanbanRepositoryResult<u64> {
        let mut state = self.write()?;
        match state.placements.get_mut(&(task_id, view_id)) {
            Some(current) => {
                *current = bucket_id;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert(&self, assignment: &TaskBucket) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        let key = (assignment.task_id, assignment.view_id);
        if state.placements.contains_key(&key) {
            return Err(KanbanRepositoryError::DuplicateAssignment {
                task_id: assignment.task_id,
                view_id: assignment.view_id,
            });
        }
        state.placements.insert(key, assignment.bucket_id);
        Ok(())
    }

    async fn count_tasks_in_bucket(&self, bucket_id: BucketId) -> KanbanRepositoryResult<u64> {
        let state = self.read()?;
        let tasks: HashSet<TaskId> = state
            .placements
            .iter()
            .filter(|(_, placed)| **placed == bucket_id)
            .map(|((task_id, _), _)| *task_id)
            .collect();
        Ok(to_count(tasks.len()))
    }

    async fn reassign_bucket(&self, from: BucketId, to: BucketId) -> KanbanRepositoryResult<u64> {
        let mut state = self.write()?;
        let mut moved = 0_u64;
        for placed in state.placements.values_mut() {
            if *placed == from {
                *placed = to;
                moved = moved.saturating_add(1);
            }
        }
        Ok(moved)
    }

    async fn list_for_view(&self, view_id: ViewId) -> KanbanRepositoryResult<Vec<TaskBucket>> {
        let state = self.read()?;
        let mut placements: Vec<TaskBucket> = state
            .placements
            .iter()
            .filter(|((_, view), _)| *view == view_id)
            .map(|((task_id, view), bucket_id)| TaskBucket::new(*task_id, *view, *bucket_id))
            .collect();
        placements.sort_by_key(|placement| placement.task_id);
        Ok(placements)
    }

    async fn find_buckets_for_tasks(
        &self,
        task_ids: &[TaskId],
        project_ids: &[ProjectId],
    ) -> KanbanRepositoryResult<Vec<(TaskId, Bucket)>> {
        let state = self.read()?;
        let mut found: Vec<(TaskId, Bucket)> = state
            .placements
            .iter()
            .filter(|((task_id, _), _)| task_ids.contains(task_id))
            .filter_map(|((task_id, view_id), bucket_id)| {
                let view = state.views.get(view_id)?;
                if !project_ids.contains(&view.project_id()) {
                    return None;
                }
                let bucket = state.buckets.get(bucket_id)?;
                Some((*task_id, bucket.clone()))
            })
            .collect();
        found.sort_by(|(left_task, left), (right_task, right)| {
            left_task
                .cmp(right_task)
                .then_with(|| left.view_id().cmp(&right.view_id()))
        });
        Ok(found)
    }
}
