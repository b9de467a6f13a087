//! Connection pool for the event database.

use std::future::Future;
use std::pin::Pin;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use rodeo_core::config::DatabaseConfig;

use crate::db::DbProvider;
use crate::error::DbResult;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

/// ## Summary
/// Creates the connection pool described by `config` and opens its idle
/// connections.
///
/// ## Errors
/// Returns an error if the initial connections cannot be established.
#[tracing::instrument(skip_all, fields(
    pool_size = config.max_connections,
    connect_timeout_secs = config.connect_timeout_secs,
))]
pub async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<DbPool> {
    let size = u32::from(config.max_connections);
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);

    let pool = Pool::builder()
        .max_size(size)
        .min_idle(Some(size))
        .connection_timeout(config.connect_timeout())
        .test_on_check_out(false)
        .build(manager)
        .await?;

    tracing::info!("Event database pool ready");

    Ok(pool)
}

impl DbProvider for DbPool {
    fn get_connection<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = DbResult<DbConnection<'a>>> + Send + 'a>> {
        Box::pin(async move {
            let conn = self.get().await.inspect_err(|e| {
                tracing::warn!(error = %e, "Could not check out a database connection");
            })?;
            Ok(conn)
        })
    }
}
