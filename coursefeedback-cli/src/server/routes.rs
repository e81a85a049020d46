use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use coursefeedback_lib::model::iso_millis;
use coursefeedback_lib::NewFeedback;
use serde_json::{json, Value};
use tracing::{error, info};

use super::error::{feedback_not_found, ApiError};
use super::state::AppState;

// ── GET /api/feedback ────────────────────────────────────────

pub async fn handle_list(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let records = state
        .repository
        .list_all()
        .await
        .map_err(|e| ApiError::from_feedback("Failed to fetch feedback", e))?;
    Ok(Json(json!({
        "message": "Feedback retrieved successfully",
        "count": records.len(),
        "data": records,
    })))
}

// ── POST /api/feedback ───────────────────────────────────────

pub async fn handle_create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewFeedback>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    const LABEL: &str = "Failed to submit feedback";

    let Json(input) = body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, LABEL, e.body_text()))?;
    let record = state
        .repository
        .create(&input)
        .await
        .map_err(|e| ApiError::from_feedback(LABEL, e))?;

    info!(id = record.id, course = %record.course_code, "feedback submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Feedback submitted successfully!",
            "data": record,
        })),
    ))
}

// ── DELETE /api/feedback/{id} ────────────────────────────────

pub async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    // a non-numeric id can never match a record
    let Ok(id) = raw_id.trim().parse::<i64>() else {
        return Ok(feedback_not_found());
    };

    let deleted = state
        .repository
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::from_feedback("Failed to delete feedback", e))?;
    if !deleted {
        return Ok(feedback_not_found());
    }

    info!(id, "feedback deleted");
    Ok(Json(json!({
        "message": "Feedback deleted successfully",
        "deletedId": id,
    }))
    .into_response())
}

// ── GET /api/feedback/stats ──────────────────────────────────

pub async fn handle_stats(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let stats = state
        .repository
        .compute_stats()
        .await
        .map_err(|e| ApiError::from_feedback("Failed to fetch statistics", e))?;
    Ok(Json(json!({
        "message": "Statistics retrieved successfully",
        "data": stats,
    })))
}

// ── GET /api/health ──────────────────────────────────────────

pub async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
    match state.repository.compute_stats().await {
        Ok(stats) => Json(json!({
            "status": "OK",
            "message": "Backend server with database is running!",
            "timestamp": iso_millis(&Utc::now()),
            "database": {
                "type": state.repository.store().kind().to_string(),
                "status": "Connected",
                "totalFeedback": stats.total,
                "averageRating": stats.average_rating,
            }
        }))
        .into_response(),
        Err(e) => {
            error!(err = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "ERROR",
                    "message": "Database connection failed",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
