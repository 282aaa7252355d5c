//! Shared fixtures for kanban unit tests.

use crate::config::KanbanConfig;
use crate::kanban::{
    adapters::memory::{
        InMemoryBoardRepository, InMemoryIdentityDirectory, InMemoryPermissionOracle,
        InMemoryTaskDirectory, RecordingEventSink, RecordingReminderScheduler,
        StaticFilterQueryEngine,
    },
    domain::{
        BoardView, Bucket, BucketId, BucketLimit, BucketTitle, NewBucket, Permission, Principal,
        ProjectId, Task, TaskId, UserId, ViewId,
    },
    ports::BucketRepository,
    services::{BoardService, BoardStorage, Collaborators},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The instant every test clock is frozen at.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixed timestamp")
}

pub(super) const PROJECT: ProjectId = ProjectId::new(7);
pub(super) const ALICE: Principal = Principal::User(UserId::new(1));
pub(super) const MALLORY: Principal = Principal::User(UserId::new(66));

/// In-memory engine with every collaborator exposed for inspection.
pub(super) struct Harness {
    pub repository: Arc<InMemoryBoardRepository>,
    pub permissions: Arc<InMemoryPermissionOracle>,
    pub tasks: Arc<InMemoryTaskDirectory>,
    pub identities: Arc<InMemoryIdentityDirectory>,
    pub events: Arc<RecordingEventSink>,
    pub reminders: Arc<RecordingReminderScheduler>,
    pub filters: Arc<StaticFilterQueryEngine>,
    pub clock: Arc<FixedClock>,
    pub service: BoardService<FixedClock>,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self::with_config(&KanbanConfig::default())
    }

    pub(super) fn with_config(config: &KanbanConfig) -> Self {
        let repository = Arc::new(InMemoryBoardRepository::new());
        let permissions = Arc::new(InMemoryPermissionOracle::new());
        let tasks = Arc::new(InMemoryTaskDirectory::new());
        let identities = Arc::new(InMemoryIdentityDirectory::new());
        let events = Arc::new(RecordingEventSink::new());
        let reminders = Arc::new(RecordingReminderScheduler::new());
        let filters = Arc::new(StaticFilterQueryEngine::new());
        let clock = Arc::new(FixedClock(now()));

        let collaborators = Collaborators {
            permissions: permissions.clone(),
            tasks: tasks.clone(),
            identities: identities.clone(),
            events: events.clone(),
            filters: filters.clone(),
            reminders: reminders.clone(),
        };
        let service = BoardService::new(
            BoardStorage::from_repository(repository.clone()),
            collaborators,
            config,
            clock.clone(),
        );

        permissions
            .grant(PROJECT, ALICE, Permission::Write)
            .expect("grant should succeed");
        tasks.allow(PROJECT, ALICE).expect("allow should succeed");

        Self {
            repository,
            permissions,
            tasks,
            identities,
            events,
            reminders,
            filters,
            clock,
            service,
        }
    }

    pub(super) fn storage(&self) -> BoardStorage {
        BoardStorage::from_repository(self.repository.clone())
    }

    pub(super) fn add_view(&self, view: BoardView) -> BoardView {
        self.repository
            .insert_view(view.clone())
            .expect("view insert should succeed");
        view
    }

    pub(super) async fn add_bucket(&self, view: &BoardView, title: &str, limit: u32) -> Bucket {
        let draft = NewBucket {
            view_id: view.id(),
            project_id: view.project_id(),
            title: BucketTitle::new(title).expect("valid title"),
            position: 0.0,
            limit: BucketLimit::new(limit).expect("valid limit"),
            created_by: ALICE,
            created_at: now(),
        };
        let mut bucket = BucketRepository::insert(&*self.repository, draft)
            .await
            .expect("bucket insert should succeed");
        bucket.reposition(
            Bucket::default_position(bucket.id(), 1000.0),
            &*self.clock,
        );
        BucketRepository::update(&*self.repository, &bucket)
            .await
            .expect("bucket update should succeed");
        bucket
    }

    pub(super) fn add_task(&self, task: Task) -> Task {
        self.tasks
            .insert(task.clone())
            .expect("task insert should succeed");
        task
    }
}

/// A manual board of [`PROJECT`].
pub(super) fn board(id: i64) -> BoardView {
    BoardView::manual_board(ViewId::new(id), PROJECT, format!("Board {id}"))
}

/// A plain open task of [`PROJECT`].
pub(super) fn task(id: i64) -> Task {
    Task::new(TaskId::new(id), PROJECT, format!("Task {id}"))
}

/// Sets a view's done bucket, returning the updated view.
pub(super) fn with_done(view: BoardView, done: BucketId) -> BoardView {
    let default = view.default_bucket_id();
    view.with_bucket_references(default, Some(done))
}
