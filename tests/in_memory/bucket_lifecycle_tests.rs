//! Integration tests for bucket creation and removal.

use super::helpers::{BoardFixture, EDITOR, PROJECT, fixture, open_task};
use kanban_sync::kanban::services::{KanbanError, MoveTaskRequest};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn buckets_list_in_creation_order_by_default(
    fixture: eyre::Result<BoardFixture>,
) -> eyre::Result<()> {
    let board = fixture?;
    let view = board.board(1)?;
    for title in ["Backlog", "Doing", "Done"] {
        board.bucket(&view, title, 0).await?;
    }

    let listed = board.service.get_all_buckets(&EDITOR, view.id()).await?;

    let titles: Vec<&str> = listed
        .iter()
        .map(|entry| entry.bucket.title().as_str())
        .collect();
    eyre::ensure!(
        titles == ["Backlog", "Doing", "Done"],
        "unexpected order {titles:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_down_to_one_bucket_then_refusing(
    fixture: eyre::Result<BoardFixture>,
) -> eyre::Result<()> {
    let board = fixture?;
    let view = board.board(1)?;
    let first = board.bucket(&view, "First", 0).await?;
    let second = board.bucket(&view, "Second", 0).await?;
    let task_id = board.task(open_task(1))?;
    board
        .service
        .move_task_to_bucket(&EDITOR, MoveTaskRequest::new(task_id, view.id(), second.id()))
        .await?;

    let deleted = board
        .service
        .delete_bucket(&EDITOR, PROJECT, view.id(), second.id())
        .await?;
    eyre::ensure!(
        deleted.fallback_bucket_id == first.id() && deleted.reassigned == 1,
        "task should fall back to the remaining bucket, got {deleted:?}"
    );
    let placement = board.placement(task_id, view.id()).await?;
    eyre::ensure!(
        placement.map(|row| row.bucket_id) == Some(first.id()),
        "placement should follow the fallback"
    );

    let refused = board
        .service
        .delete_bucket(&EDITOR, PROJECT, view.id(), first.id())
        .await;
    eyre::ensure!(
        matches!(refused, Err(KanbanError::CannotRemoveLastBucket { .. })),
        "last bucket must survive, got {refused:?}"
    );
    Ok(())
}
