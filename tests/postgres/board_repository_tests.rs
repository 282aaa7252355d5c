//! Board repository behaviour against a live `PostgreSQL` database.

use crate::postgres::helpers::{
    BoxError, EDITOR, OTHER_PROJECT, PROJECT, PostgresBoard, postgres_board,
};
use kanban_sync::kanban::{
    domain::TaskBucket,
    ports::{BucketRepository, TaskBucketRepository, ViewRepository},
    services::{KanbanError, MoveTaskRequest},
};
use rstest::rstest;

#[rstest]
fn occupancy_counts_tasks_per_bucket_and_enforces_the_limit(
    postgres_board: Result<Option<PostgresBoard>, BoxError>,
) -> Result<(), BoxError> {
    let Some(board) = postgres_board? else {
        return Ok(());
    };
    let view = board.board(PROJECT, "Board")?;
    let todo = board.bucket(&view, "To do", 0)?;
    let doing = board.bucket(&view, "Doing", 3)?;
    for id in 1..=3 {
        let task_id = board.task(id, PROJECT)?;
        board.place(task_id, &doing)?;
    }
    let waiting = board.task(4, PROJECT)?;
    board.place(waiting, &todo)?;

    let occupied = board
        .runtime
        .block_on(board.repository.count_tasks_in_bucket(doing.id()))?;
    assert_eq!(occupied, 3);

    let result = board.runtime.block_on(
        board
            .service
            .move_task_to_bucket(&EDITOR, MoveTaskRequest::new(waiting, view.id(), doing.id())),
    );
    assert!(
        matches!(
            result,
            Err(KanbanError::BucketLimitExceeded { task_id, bucket_id, limit: 3 })
                if task_id == waiting && bucket_id == doing.id()
        ),
        "expected the full bucket to refuse, got {result:?}"
    );
    let still_waiting = board
        .runtime
        .block_on(board.repository.find(waiting, view.id()))?;
    assert_eq!(
        still_waiting,
        Some(TaskBucket::new(waiting, view.id(), todo.id()))
    );
    Ok(())
}

#[rstest]
fn deleting_a_bucket_moves_its_rows_and_clears_references(
    postgres_board: Result<Option<PostgresBoard>, BoxError>,
) -> Result<(), BoxError> {
    let Some(board) = postgres_board? else {
        return Ok(());
    };
    let view = board.board(PROJECT, "Board")?;
    let backlog = board.bucket(&view, "Backlog", 0)?;
    let doing = board.bucket(&view, "Doing", 0)?;
    let view = view.with_bucket_references(Some(backlog.id()), Some(doing.id()));
    board
        .runtime
        .block_on(board.repository.update_bucket_references(&view))?;
    for id in [1, 2] {
        let task_id = board.task(id, PROJECT)?;
        board.place(task_id, &doing)?;
    }

    let deleted = board.runtime.block_on(board.service.delete_bucket(
        &EDITOR,
        PROJECT,
        view.id(),
        doing.id(),
    ))?;

    assert_eq!(deleted.fallback_bucket_id, backlog.id());
    assert_eq!(deleted.reassigned, 2);
    assert!(deleted.cleared_done);
    assert!(!deleted.cleared_default);
    let rows = board.placements(&view)?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.bucket_id == backlog.id()));
    let stored_view = board
        .runtime
        .block_on(ViewRepository::find_by_id(&*board.repository, view.id()))?
        .expect("view still exists");
    assert_eq!(stored_view.default_bucket_id(), Some(backlog.id()));
    assert_eq!(stored_view.done_bucket_id(), None);
    let gone = board
        .runtime
        .block_on(BucketRepository::find_by_id(&*board.repository, doing.id()))?;
    assert_eq!(gone, None);
    Ok(())
}

#[rstest]
fn last_bucket_survives_on_postgres(
    postgres_board: Result<Option<PostgresBoard>, BoxError>,
) -> Result<(), BoxError> {
    let Some(board) = postgres_board? else {
        return Ok(());
    };
    let view = board.board(PROJECT, "Board")?;
    let only = board.bucket(&view, "Only", 0)?;

    let result = board.runtime.block_on(board.service.delete_bucket(
        &EDITOR,
        PROJECT,
        view.id(),
        only.id(),
    ));

    assert!(matches!(
        result,
        Err(KanbanError::CannotRemoveLastBucket { bucket_id, .. }) if bucket_id == only.id()
    ));
    let count = board
        .runtime
        .block_on(board.repository.count_for_view(view.id()))?;
    assert_eq!(count, 1);
    Ok(())
}

#[rstest]
fn batch_lookup_only_returns_accessible_projects(
    postgres_board: Result<Option<PostgresBoard>, BoxError>,
) -> Result<(), BoxError> {
    let Some(board) = postgres_board? else {
        return Ok(());
    };
    let visible = board.board(PROJECT, "Visible")?;
    let hidden = board.board(OTHER_PROJECT, "Hidden")?;
    let visible_bucket = board.bucket(&visible, "To do", 0)?;
    let hidden_bucket = board.bucket(&hidden, "To do", 0)?;
    let placed = board.task(1, PROJECT)?;
    let unplaced = board.task(2, PROJECT)?;
    board.place(placed, &visible_bucket)?;
    board.place(placed, &hidden_bucket)?;

    let found = board
        .runtime
        .block_on(board.service.add_buckets_to_tasks(&[placed, unplaced], &[PROJECT]))?;

    let placed_buckets = found.get(&placed).expect("placed task has an entry");
    assert_eq!(placed_buckets.len(), 1);
    let bucket = placed_buckets.first().expect("one visible bucket");
    assert_eq!(bucket.id(), visible_bucket.id());
    assert_eq!(bucket.title().as_str(), "To do");
    assert_eq!(bucket.view_id(), visible.id());
    assert_eq!(found.get(&unplaced).map(Vec::len), Some(0));
    Ok(())
}
