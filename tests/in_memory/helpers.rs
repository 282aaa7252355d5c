//! Shared fixtures for in-memory board integration tests.

use std::sync::Arc;

use kanban_sync::config::KanbanConfig;
use kanban_sync::kanban::{
    adapters::memory::{
        InMemoryBoardRepository, InMemoryIdentityDirectory, InMemoryPermissionOracle,
        InMemoryTaskDirectory, RecordingEventSink, RecordingReminderScheduler,
        StaticFilterQueryEngine,
    },
    domain::{
        BoardView, Bucket, Permission, Principal, ProjectId, Task, TaskBucket, TaskId, UserId,
        ViewId,
    },
    ports::TaskBucketRepository,
    services::{BoardService, BoardStorage, Collaborators, CreateBucketRequest},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the integration tests.
pub type TestService = BoardService<DefaultClock>;

/// Project every fixture board belongs to.
pub const PROJECT: ProjectId = ProjectId::new(1);

/// Principal with write access to [`PROJECT`].
pub const EDITOR: Principal = Principal::User(UserId::new(10));

/// Board engine over in-memory adapters.
pub struct BoardFixture {
    pub repository: Arc<InMemoryBoardRepository>,
    pub tasks: Arc<InMemoryTaskDirectory>,
    pub events: Arc<RecordingEventSink>,
    pub service: TestService,
}

impl BoardFixture {
    /// Builds the engine and grants [`EDITOR`] write access.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the permission tables fails.
    pub fn new() -> eyre::Result<Self> {
        let repository = Arc::new(InMemoryBoardRepository::new());
        let permissions = Arc::new(InMemoryPermissionOracle::new());
        let tasks = Arc::new(InMemoryTaskDirectory::new());
        let events = Arc::new(RecordingEventSink::new());
        permissions.grant(PROJECT, EDITOR, Permission::Write)?;
        tasks.allow(PROJECT, EDITOR)?;

        let service = BoardService::new(
            BoardStorage::from_repository(repository.clone()),
            Collaborators {
                permissions,
                tasks: tasks.clone(),
                identities: Arc::new(InMemoryIdentityDirectory::new()),
                events: events.clone(),
                filters: Arc::new(StaticFilterQueryEngine::new()),
                reminders: Arc::new(RecordingReminderScheduler::new()),
            },
            &KanbanConfig::default(),
            Arc::new(DefaultClock),
        );

        Ok(Self {
            repository,
            tasks,
            events,
            service,
        })
    }

    /// Stores a manual kanban board of [`PROJECT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be stored.
    pub fn board(&self, id: i64) -> eyre::Result<BoardView> {
        self.save_view(BoardView::manual_board(
            ViewId::new(id),
            PROJECT,
            format!("Board {id}"),
        ))
    }

    /// Stores or replaces a view.
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be stored.
    pub fn save_view(&self, view: BoardView) -> eyre::Result<BoardView> {
        self.repository.insert_view(view.clone())?;
        Ok(view)
    }

    /// Creates a bucket through the service.
    ///
    /// # Errors
    ///
    /// Returns an error if bucket creation fails.
    pub async fn bucket(&self, view: &BoardView, title: &str, limit: u32) -> eyre::Result<Bucket> {
        let created = self
            .service
            .create_bucket(
                &EDITOR,
                view.id(),
                CreateBucketRequest::new(title).with_limit(limit),
            )
            .await?;
        Ok(created.bucket)
    }

    /// Registers a task of [`PROJECT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the task directory rejects the task.
    pub fn task(&self, task: Task) -> eyre::Result<TaskId> {
        let id = task.id();
        self.tasks.insert(task)?;
        Ok(id)
    }

    /// Returns the placement of a task in a view.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn placement(
        &self,
        task_id: TaskId,
        view_id: ViewId,
    ) -> eyre::Result<Option<TaskBucket>> {
        Ok(TaskBucketRepository::find(&*self.repository, task_id, view_id).await?)
    }
}

/// Provides a fresh board engine for each test.
///
/// # Errors
///
/// Returns an error if the fixture cannot be seeded.
#[fixture]
pub fn fixture() -> eyre::Result<BoardFixture> {
    BoardFixture::new()
}

/// A plain open task of [`PROJECT`].
#[must_use]
pub fn open_task(id: i64) -> Task {
    Task::new(TaskId::new(id), PROJECT, format!("Task {id}"))
}
