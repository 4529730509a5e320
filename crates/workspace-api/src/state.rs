use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use workspace_db::Database;

use crate::error::ApiError;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(1);

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    /// Deadline for every store call made on behalf of a request.
    pub query_timeout: Duration,
    pub health_timeout: Duration,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, query_timeout: Duration) -> Self {
        Self {
            db,
            query_timeout,
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    /// Run a blocking store call off the async runtime under the request deadline.
    ///
    /// On timeout the request is released; the blocking call itself cannot be
    /// interrupted and finishes on its worker thread.
    pub async fn run_db<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(self.db.clone(), self.query_timeout, f).await
    }
}

pub(crate) async fn run_blocking<F, T>(
    db: Arc<Database>,
    deadline: Duration,
    f: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || f(&db));

    match tokio::time::timeout(deadline, task).await {
        Err(_) => {
            warn!("Database call exceeded {:?}", deadline);
            Err(ApiError::Timeout)
        }
        Ok(Err(e)) => Err(ApiError::Internal(
            anyhow::Error::new(e).context("spawn_blocking join error"),
        )),
        Ok(Ok(result)) => result.map_err(ApiError::Internal),
    }
}
