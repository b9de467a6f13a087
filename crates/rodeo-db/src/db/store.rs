//! Persistence seam used by the service layer.

use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use crate::db::DbProvider;
use crate::db::connection::DbPool;
use crate::db::query;
use crate::error::DbResult;
use crate::model::event::NewEvent;

/// Boxed future returned by [`EventStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = DbResult<T>> + Send + 'a>>;

/// ## Summary
/// Creates event records.
///
/// Each call persists exactly one event row with its discipline and sanction
/// links. Callers that create a series issue one call per occurrence.
pub trait EventStore: Send + Sync {
    fn create_event<'a>(
        &'a self,
        event: NewEvent,
        discipline_ids: &'a [i32],
        sanction_ids: &'a [i32],
    ) -> StoreFuture<'a, Uuid>;
}

impl EventStore for DbPool {
    fn create_event<'a>(
        &'a self,
        event: NewEvent,
        discipline_ids: &'a [i32],
        sanction_ids: &'a [i32],
    ) -> StoreFuture<'a, Uuid> {
        Box::pin(async move {
            let start = event.start_datetime;
            let mut conn = self.get_connection().await?;
            let id = query::event::insert_with_links(
                &mut conn,
                event,
                discipline_ids.to_vec(),
                sanction_ids.to_vec(),
            )
            .await?;
            tracing::debug!(%id, %start, "Event row created");
            Ok(id)
        })
    }
}
