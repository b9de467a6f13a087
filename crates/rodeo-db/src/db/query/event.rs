//! Query composition for `event` and its link tables.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::enums::EventStatus;
use crate::db::schema::{event, event_discipline, event_sanction};
use crate::error::DbError;
use crate::model::event::{Event, EventDiscipline, EventSanction, NewEvent};

/// ## Summary
/// Inserts an event row and returns its id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new_event: &NewEvent) -> QueryResult<Uuid> {
    diesel::insert_into(event::table)
        .values(new_event)
        .returning(event::id)
        .get_result(conn)
        .await
}

/// ## Summary
/// Links disciplines to an event.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_disciplines(
    conn: &mut DbConnection<'_>,
    event_id: Uuid,
    discipline_ids: &[i32],
) -> QueryResult<()> {
    if discipline_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<EventDiscipline> = discipline_ids
        .iter()
        .map(|&discipline_id| EventDiscipline {
            event_id,
            discipline_id,
        })
        .collect();

    diesel::insert_into(event_discipline::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Links sanctioning bodies to an event.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_sanctions(
    conn: &mut DbConnection<'_>,
    event_id: Uuid,
    sanction_ids: &[i32],
) -> QueryResult<()> {
    if sanction_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<EventSanction> = sanction_ids
        .iter()
        .map(|&sanction_id| EventSanction {
            event_id,
            sanction_id,
        })
        .collect();

    diesel::insert_into(event_sanction::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Inserts an event row together with its discipline and sanction links in
/// one transaction.
///
/// ## Errors
/// Returns an error if any insert fails; nothing from this call is kept.
pub async fn insert_with_links(
    conn: &mut DbConnection<'_>,
    new_event: NewEvent,
    discipline_ids: Vec<i32>,
    sanction_ids: Vec<i32>,
) -> Result<Uuid, DbError> {
    conn.transaction::<_, DbError, _>(move |tx| {
        async move {
            let event_id = insert(tx, &new_event).await?;
            insert_disciplines(tx, event_id, &discipline_ids).await?;
            insert_sanctions(tx, event_id, &sanction_ids).await?;
            Ok(event_id)
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Selects events with the given status whose start falls in `[from, to]`,
/// ordered by start.
#[must_use]
pub fn by_status_between(
    status: EventStatus,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> event::BoxedQuery<'static, Pg> {
    event::table
        .filter(event::status.eq(status))
        .filter(event::start_datetime.ge(from))
        .filter(event::start_datetime.le(to))
        .order(event::start_datetime.asc())
        .into_boxed()
}

/// ## Summary
/// Loads events with the given status starting within `[from, to]`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_by_status_between(
    conn: &mut DbConnection<'_>,
    status: EventStatus,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> QueryResult<Vec<Event>> {
    by_status_between(status, from, to)
        .select(Event::as_select())
        .load(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_window_query_filters_and_orders() {
        let from = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap();
        let query = by_status_between(EventStatus::Approved, from, to).select(event::id);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains("\"event\".\"status\" = $1"), "{sql}");
        assert!(sql.contains("\"event\".\"start_datetime\" >= $2"), "{sql}");
        assert!(sql.contains("\"event\".\"start_datetime\" <= $3"), "{sql}");
        assert!(sql.contains("ORDER BY \"event\".\"start_datetime\" ASC"), "{sql}");
    }
}
