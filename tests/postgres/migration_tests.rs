//! Schema rollback tests for the kanban migration.

use crate::postgres::cluster::PostgresCluster;
use crate::postgres::helpers::{
    BoxError, CREATE_KANBAN_TABLES_SQL, DROP_KANBAN_TABLES_SQL, TemporaryDatabase,
    postgres_cluster,
};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use rstest::rstest;

#[derive(diesel::QueryableByName)]
struct TableCheck {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    present: bool,
}

#[derive(diesel::QueryableByName)]
struct RowCount {
    #[diesel(sql_type = diesel::sql_types::Int8)]
    total: i64,
}

fn table_exists(conn: &mut PgConnection, table: &str) -> Result<bool, BoxError> {
    let check = diesel::sql_query("SELECT to_regclass($1) IS NOT NULL AS present")
        .bind::<diesel::sql_types::Text, _>(table)
        .get_result::<TableCheck>(conn)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(check.present)
}

fn view_rows(conn: &mut PgConnection) -> Result<i64, BoxError> {
    let count = diesel::sql_query("SELECT COUNT(*) AS total FROM project_views")
        .get_result::<RowCount>(conn)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(count.total)
}

#[rstest]
fn rolling_back_keeps_foreign_project_views(
    postgres_cluster: Option<PostgresCluster>,
) -> Result<(), BoxError> {
    let Some(cluster) = postgres_cluster else {
        return Ok(());
    };
    let database = TemporaryDatabase::create(cluster, "kanban_migration")?;
    let mut conn = database.connect()?;
    conn.batch_execute(concat!(
        "INSERT INTO project_views (project_id, title, view_kind) ",
        "VALUES (4, 'Owned elsewhere', 'list')",
    ))
    .map_err(|e| Box::new(e) as BoxError)?;

    conn.batch_execute(DROP_KANBAN_TABLES_SQL)
        .map_err(|e| Box::new(e) as BoxError)?;

    assert!(table_exists(&mut conn, "project_views")?);
    assert_eq!(view_rows(&mut conn)?, 1);
    assert!(!table_exists(&mut conn, "buckets")?);
    assert!(!table_exists(&mut conn, "task_buckets")?);

    conn.batch_execute(CREATE_KANBAN_TABLES_SQL)
        .map_err(|e| Box::new(e) as BoxError)?;

    assert!(table_exists(&mut conn, "buckets")?);
    assert!(table_exists(&mut conn, "task_buckets")?);
    assert_eq!(view_rows(&mut conn)?, 1);
    Ok(())
}
