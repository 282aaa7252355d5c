//! Then steps for board synchronisation BDD scenarios.

use super::world::{BoardWorld, run_async, task_id};
use kanban_sync::kanban::{ports::TaskBucketRepository, services::KanbanError};
use rstest_bdd_macros::then;

#[then(r#"task {number:i64} is in "{title}""#)]
fn task_is_in(world: &BoardWorld, number: i64, title: String) -> Result<(), eyre::Report> {
    let expected = world.bucket(&title)?.id();
    let placement = run_async(TaskBucketRepository::find(
        &*world.repository,
        task_id(number),
        world.view.id(),
    ))?
    .ok_or_else(|| eyre::eyre!("task {number} has no placement"))?;

    if placement.bucket_id != expected {
        return Err(eyre::eyre!(
            "expected task {number} in {expected}, found {}",
            placement.bucket_id
        ));
    }
    Ok(())
}

#[then("task {number:i64} is done")]
fn task_is_done(world: &BoardWorld, number: i64) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.tasks.stored(task_id(number))?.done(),
        "expected task {number} to be done"
    );
    Ok(())
}

#[then("task {number:i64} is not done")]
fn task_is_not_done(world: &BoardWorld, number: i64) -> Result<(), eyre::Report> {
    eyre::ensure!(
        !world.tasks.stored(task_id(number))?.done(),
        "expected task {number} to be open"
    );
    Ok(())
}

#[then("the move fails because the bucket is full")]
fn move_fails_on_limit(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;

    if !matches!(result, Err(KanbanError::BucketLimitExceeded { .. })) {
        return Err(eyre::eyre!(
            "expected BucketLimitExceeded error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the deletion fails because it is the last bucket")]
fn deletion_fails_on_last_bucket(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_deletion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing deletion result"))?;

    if !matches!(result, Err(KanbanError::CannotRemoveLastBucket { .. })) {
        return Err(eyre::eyre!(
            "expected CannotRemoveLastBucket error, got {result:?}"
        ));
    }
    Ok(())
}
