//! Schedule ↔ service links.
//!
//! Every function works on a borrowed connection so the caller decides the
//! transaction boundary.

use sqlx::SqliteConnection;
use std::collections::BTreeSet;

pub async fn link(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    service_id: i64,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO schedule_services(services_id,schedule_id) VALUES($1,$2);")
        .bind(service_id)
        .bind(schedule_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Returns the number of removed links
pub async fn unlink_all_for_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> anyhow::Result<u64> {
    Ok(
        sqlx::query("DELETE FROM schedule_services WHERE schedule_id=$1;")
            .bind(schedule_id)
            .execute(&mut *conn)
            .await?
            .rows_affected(),
    )
}

/// Removes every link of the service and returns the schedules it touched
pub async fn unlink_all_for_service(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> anyhow::Result<BTreeSet<i64>> {
    let touched: Vec<i64> = sqlx::query_scalar(
        "SELECT DISTINCT schedule_id FROM schedule_services WHERE services_id=$1;",
    )
    .bind(service_id)
    .fetch_all(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM schedule_services WHERE services_id=$1;")
        .bind(service_id)
        .execute(&mut *conn)
        .await?;

    Ok(touched.into_iter().collect())
}

pub async fn remaining_services(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> anyhow::Result<i64> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM schedule_services WHERE schedule_id=$1;")
            .bind(schedule_id)
            .fetch_one(&mut *conn)
            .await?,
    )
}
