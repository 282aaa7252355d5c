//! Shared world state for board synchronisation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use kanban_sync::config::KanbanConfig;
use kanban_sync::kanban::{
    adapters::memory::{
        InMemoryBoardRepository, InMemoryIdentityDirectory, InMemoryPermissionOracle,
        InMemoryTaskDirectory, RecordingEventSink, RecordingReminderScheduler,
        StaticFilterQueryEngine,
    },
    domain::{BoardView, Bucket, Permission, Principal, ProjectId, TaskId, UserId, ViewId},
    services::{
        BoardService, BoardStorage, Collaborators, DeletedBucket, KanbanResult, MoveOutcome,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Project the scenario board belongs to.
pub const PROJECT: ProjectId = ProjectId::new(3);

/// Principal performing every scenario action.
pub const ACTOR: Principal = Principal::User(UserId::new(5));

/// Scenario world for board synchronisation behaviour tests.
pub struct BoardWorld {
    pub repository: Arc<InMemoryBoardRepository>,
    pub tasks: Arc<InMemoryTaskDirectory>,
    pub service: BoardService<DefaultClock>,
    pub view: BoardView,
    pub buckets: HashMap<String, Bucket>,
    pub last_move: Option<KanbanResult<MoveOutcome>>,
    pub last_deletion: Option<KanbanResult<DeletedBucket>>,
}

impl BoardWorld {
    /// Creates a world with an empty board the actor may edit.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory adapters cannot be seeded.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryBoardRepository::new());
        let permissions = Arc::new(InMemoryPermissionOracle::new());
        let tasks = Arc::new(InMemoryTaskDirectory::new());
        permissions
            .grant(PROJECT, ACTOR, Permission::Write)
            .expect("grant should succeed");
        tasks.allow(PROJECT, ACTOR).expect("allow should succeed");

        let service = BoardService::new(
            BoardStorage::from_repository(repository.clone()),
            Collaborators {
                permissions,
                tasks: tasks.clone(),
                identities: Arc::new(InMemoryIdentityDirectory::new()),
                events: Arc::new(RecordingEventSink::new()),
                filters: Arc::new(StaticFilterQueryEngine::new()),
                reminders: Arc::new(RecordingReminderScheduler::new()),
            },
            &KanbanConfig::default(),
            Arc::new(DefaultClock),
        );
        let view = BoardView::manual_board(ViewId::new(1), PROJECT, "Scenario board");
        repository
            .insert_view(view.clone())
            .expect("view insert should succeed");

        Self {
            repository,
            tasks,
            service,
            view,
            buckets: HashMap::new(),
            last_move: None,
            last_deletion: None,
        }
    }

    /// Looks up a bucket created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no bucket with `title` exists.
    pub fn bucket(&self, title: &str) -> eyre::Result<&Bucket> {
        self.buckets
            .get(title)
            .ok_or_else(|| eyre::eyre!("unknown bucket {title} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Converts a scenario task number to its identifier.
#[must_use]
pub const fn task_id(number: i64) -> TaskId {
    TaskId::new(number)
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
