use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;

use workspace_types::api::{HealthResponse, HealthState, MessageResponse};

use crate::state::{AppState, run_blocking};

/// GET /
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".into(),
    })
}

/// GET /health — pings the store under a short deadline. An unreachable store
/// is reported as 503, never escalated.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match run_blocking(state.db.clone(), state.health_timeout, |db| db.ping()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: HealthState::Up,
                message: "It's healthy".into(),
            }),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: HealthState::Down,
                    message: "database unreachable".into(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::Method;
    use serde_json::json;

    use crate::testing::{TestApp, send};

    #[tokio::test]
    async fn root_says_hello() {
        let app = TestApp::new();
        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(body.json(), json!({"message": "Hello World"}));
    }

    #[tokio::test]
    async fn health_reports_up() {
        let app = TestApp::new();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(body.json()["status"], "up");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn health_reports_down_when_store_is_stuck_and_keeps_serving() {
        let app = TestApp::with_health_timeout(Duration::from_millis(100));

        // Hold the writer past the health deadline.
        let db = app.state.db.clone();
        let holder = std::thread::spawn(move || {
            db.with_conn_mut(|_| {
                std::thread::sleep(Duration::from_millis(600));
                Ok(())
            })
        });
        std::thread::sleep(Duration::from_millis(50));

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.json()["status"], "down");

        holder.join().unwrap().unwrap();

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(body.json()["status"], "up");
    }
}
