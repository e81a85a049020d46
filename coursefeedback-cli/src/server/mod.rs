pub mod config;
mod error;
mod routes;
pub mod state;

use std::path::Path;
use std::sync::Arc;

use axum::routing::{delete, get};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use self::config::StorageBackend;
use self::error::{panic_response, route_not_found};
use self::routes::{handle_create, handle_delete, handle_health, handle_list, handle_stats};
use self::state::AppState;

/// Build the HTTP router for `state`.
///
/// With file storage the data directory is also exposed read-only under
/// `/api/data` for debugging.
pub fn app(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/feedback", get(handle_list).post(handle_create))
        .route("/api/feedback/stats", get(handle_stats))
        .route("/api/feedback/{id}", delete(handle_delete));

    if state.config.storage.backend == StorageBackend::File {
        let data_dir = Path::new(&state.config.storage.data_file)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        router = router.nest_service("/api/data", ServeDir::new(data_dir));
    }

    router
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::config::FeedbackConfig;
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use coursefeedback_lib::Validation;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn memory_app(validation: Validation) -> Router {
        let mut config = FeedbackConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.validation.mode = validation;
        app(AppState::from_config(config))
    }

    fn file_app(dir: &TempDir) -> Router {
        let mut config = FeedbackConfig::default();
        config.storage.data_file = dir
            .path()
            .join("data/feedback.json")
            .to_string_lossy()
            .into_owned();
        app(AppState::from_config(config))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(b) => {
                builder = builder.header("content-type", "application/json");
                Body::from(b.to_string())
            }
            None => Body::empty(),
        };
        router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const ALICE: &str =
        r#"{"studentName":"Alice","courseCode":"cs101","comments":"Great course","rating":5}"#;

    #[tokio::test]
    async fn test_submit_then_list_and_stats() {
        let router = memory_app(Validation::Strict);

        let res = send(&router, "GET", "/api/feedback", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["count"], 0);

        let res = send(&router, "POST", "/api/feedback", Some(ALICE)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = json_body(res).await;
        assert_eq!(body["message"], "Feedback submitted successfully!");
        assert_eq!(body["data"]["courseCode"], "CS101");
        assert!(body["data"]["id"].is_i64());

        let res = send(&router, "GET", "/api/feedback", None).await;
        let body = json_body(res).await;
        assert_eq!(body["message"], "Feedback retrieved successfully");
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["studentName"], "Alice");

        let res = send(&router, "GET", "/api/feedback/stats", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["averageRating"], 5.0);
        assert_eq!(body["data"]["courseCounts"]["CS101"], 1);
        assert_eq!(body["data"]["totalCourses"], 1);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let router = memory_app(Validation::Strict);
        let body = r#"{"studentName":"Alice","courseCode":"cs101","comments":"Great","rating":6}"#;

        let res = send(&router, "POST", "/api/feedback", Some(body)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert_eq!(body["error"], "Failed to submit feedback");
        assert_eq!(body["message"], "Rating must be between 1 and 5");

        let res = send(&router, "GET", "/api/feedback", None).await;
        assert_eq!(json_body(res).await["count"], 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let router = memory_app(Validation::Strict);
        let res = send(&router, "POST", "/api/feedback", Some("{not json")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "Failed to submit feedback");
    }

    #[tokio::test]
    async fn test_none_validation_accepts_incomplete_submission() {
        let router = memory_app(Validation::None);
        let res = send(&router, "POST", "/api/feedback", Some(r#"{"rating":"9"}"#)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(json_body(res).await["data"]["rating"], 9);
    }

    #[tokio::test]
    async fn test_delete_found_then_missing() {
        let router = memory_app(Validation::Strict);
        let res = send(&router, "POST", "/api/feedback", Some(ALICE)).await;
        let id = json_body(res).await["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/feedback/{}", id);
        let res = send(&router, "DELETE", &uri, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["message"], "Feedback deleted successfully");
        assert_eq!(body["deletedId"], id);

        let res = send(&router, "DELETE", &uri, None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["error"], "Feedback not found");

        let res = send(&router, "DELETE", "/api/feedback/abc", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let router = memory_app(Validation::Strict);
        let res = send(&router, "GET", "/api/health", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["database"]["type"], "Memory");
        assert_eq!(body["database"]["status"], "Connected");
        assert_eq!(body["database"]["totalFeedback"], 0);
    }

    #[tokio::test]
    async fn test_health_fails_on_unreadable_store() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/feedback.json"), "oops").unwrap();
        let router = file_app(&dir);

        let res = send(&router, "GET", "/api/health", None).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(res).await;
        assert_eq!(body["status"], "ERROR");
        assert_eq!(body["message"], "Database connection failed");

        let res = send(&router, "GET", "/api/feedback", None).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await["error"], "Failed to fetch feedback");
    }

    #[tokio::test]
    async fn test_file_backend_persists_and_serves_data() {
        let dir = TempDir::new().unwrap();
        let router = file_app(&dir);
        let res = send(&router, "POST", "/api/feedback", Some(ALICE)).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let on_disk = std::fs::read_to_string(dir.path().join("data/feedback.json")).unwrap();
        assert!(on_disk.contains("\"courseCode\": \"CS101\""));

        let res = send(&router, "GET", "/api/data/feedback.json", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await[0]["studentName"], "Alice");
    }

    #[tokio::test]
    async fn test_storage_write_failure_on_submit() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("feedback.json"), "[]").unwrap();
        // a non-empty directory where the temp file should go makes the write fail
        let blocker = data.join("feedback.json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("child"), "x").unwrap();
        let router = file_app(&dir);

        let res = send(&router, "POST", "/api/feedback", Some(ALICE)).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(res).await;
        assert_eq!(body["error"], "Failed to submit feedback");
        assert!(body["message"].as_str().unwrap().contains("I/O error"));

        assert_eq!(
            std::fs::read_to_string(data.join("feedback.json")).unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn test_stats_survive_huge_unvalidated_ratings() {
        let router = memory_app(Validation::None);
        let body = format!(r#"{{"rating":{}}}"#, i64::MAX);
        for _ in 0..2 {
            let res = send(&router, "POST", "/api/feedback", Some(&body)).await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = send(&router, "GET", "/api/feedback/stats", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["data"]["total"], 2);
        assert!(body["data"]["averageRating"].as_f64().unwrap() > 9.0e18);

        let res = send(&router, "GET", "/api/health", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["database"]["totalFeedback"], 2);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = memory_app(Validation::Strict);
        let res = send(&router, "GET", "/api/nope", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["error"], "Route not found");
    }
}
