pub mod error;
pub mod extract;
pub mod health;
pub mod state;
pub mod workspaces;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Full HTTP surface of the service, with request tracing attached.
pub fn router(state: AppState) -> Router {
    let workspace_routes = Router::new()
        .route(
            "/",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route(
            "/{id}",
            get(workspaces::get_workspace)
                .patch(workspaces::update_workspace)
                .delete(workspaces::delete_workspace),
        );

    Router::new()
        .route("/", get(health::hello))
        .route("/health", get(health::health))
        .nest("/api/v1/workspace", workspace_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, Bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use workspace_db::{Database, DbOptions};

    use super::*;
    use crate::state::{DEFAULT_QUERY_TIMEOUT, HEALTH_TIMEOUT};

    /// Router over a throwaway database file, removed on drop.
    pub struct TestApp {
        pub state: AppState,
        path: PathBuf,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::with_timeouts(DEFAULT_QUERY_TIMEOUT, HEALTH_TIMEOUT)
        }

        pub fn with_health_timeout(health_timeout: Duration) -> Self {
            Self::with_timeouts(DEFAULT_QUERY_TIMEOUT, health_timeout)
        }

        pub fn with_timeouts(query_timeout: Duration, health_timeout: Duration) -> Self {
            let path = std::env::temp_dir()
                .join(format!("workspace-api-{}.sqlite3", uuid::Uuid::new_v4()));
            let db = Database::open(&DbOptions::new(&path)).unwrap();
            let mut inner = AppStateInner::new(Arc::new(db), query_timeout);
            inner.health_timeout = health_timeout;
            Self {
                state: Arc::new(inner),
                path,
            }
        }
    }

    impl Drop for TestApp {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
            }
        }
    }

    pub struct TestBody {
        pub content_type: Option<String>,
        pub bytes: Bytes,
    }

    impl TestBody {
        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.bytes)
                .unwrap_or_else(|e| panic!("body is not JSON: {e}; body={:?}", self.bytes))
        }

        pub fn text(&self) -> String {
            String::from_utf8(self.bytes.to_vec()).unwrap()
        }
    }

    /// One request through a fresh router built over the app's state.
    pub async fn send(
        app: &TestApp,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, TestBody) {
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();

        let response = router(app.state.clone()).oneshot(request).await.unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, TestBody { content_type, bytes })
    }
}
