use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::AllocationError;
use crate::services::{allocation, import};
use crate::store::SeatingStore;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exams/{exam_id}/seating/auto", post(auto_allocate))
        .route("/exams/{exam_id}/seating/import", post(import_allocations))
        .route(
            "/exams/{exam_id}/seating",
            get(seating_for_exam).delete(clear_seating_for_exam),
        )
        .route("/venues/{venue_id}/seating", get(seating_for_venue))
        .route("/students/{student_id}/seating", get(seating_for_student))
}

// POST /api/exams/{exam_id}/seating/auto
async fn auto_allocate(
    State(state): State<Arc<AppState>>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AllocationError> {
    let seatings = allocation::auto_allocate(&state.db, exam_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "count": seatings.len(),
            "seatings": seatings,
        })),
    ))
}

// POST /api/exams/{exam_id}/seating/import (raw CSV/text body)
async fn import_allocations(
    State(state): State<Arc<AppState>>,
    Path(exam_id): Path<i64>,
    body: String,
) -> Result<impl IntoResponse, AllocationError> {
    let seatings = import::import_manual_allocations(&state.db, exam_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "count": seatings.len(),
            "seatings": seatings,
        })),
    ))
}

// GET /api/exams/{exam_id}/seating
async fn seating_for_exam(
    State(state): State<Arc<AppState>>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AllocationError> {
    let seatings = state.db.seatings_for_exam(exam_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": seatings.len(),
        "seatings": seatings,
    })))
}

// DELETE /api/exams/{exam_id}/seating
async fn clear_seating_for_exam(
    State(state): State<Arc<AppState>>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AllocationError> {
    let deleted = state.db.delete_seatings_for_exam(exam_id).await?;
    Ok(Json(json!({
        "success": true,
        "deleted": deleted,
    })))
}

// GET /api/venues/{venue_id}/seating
async fn seating_for_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<impl IntoResponse, AllocationError> {
    let seatings = state.db.seatings_for_venue(venue_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": seatings.len(),
        "seatings": seatings,
    })))
}

// GET /api/students/{student_id}/seating
async fn seating_for_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AllocationError> {
    let seatings = state.db.seatings_for_student(student_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": seatings.len(),
        "seatings": seatings,
    })))
}
