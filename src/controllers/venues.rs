use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::models::{NewVenue, Venue};
use crate::store::SeatingStore;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/venues", get(list_venues).post(create_venue))
}

// GET /api/venues, available first, largest capacity first
async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let venues = sqlx::query_as::<_, Venue>(
        r#"
        SELECT id, name, block, capacity, exam_type, available
        FROM venues
        ORDER BY available DESC, capacity DESC, id
        "#,
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_venues sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load venues".to_string(),
        )
    })?;

    Ok(Json(json!({
        "success": true,
        "count": venues.len(),
        "venues": venues,
    })))
}

#[derive(Debug, Deserialize)]
struct CreateVenueRequest {
    name: String,
    block: Option<String>,
    capacity: i32,
    exam_type: Option<String>,
    available: Option<bool>,
}

// POST /api/venues
async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name must not be empty".to_string()));
    }
    if req.capacity <= 0 {
        return Err((StatusCode::BAD_REQUEST, "capacity must be > 0".to_string()));
    }

    let venue = state
        .db
        .create_venue(NewVenue {
            name: req.name.trim().to_string(),
            block: req.block.unwrap_or_default(),
            capacity: req.capacity,
            exam_type: req.exam_type.unwrap_or_else(|| "All".to_string()),
            available: req.available.unwrap_or(true),
        })
        .await
        .map_err(|e| {
            tracing::error!("create_venue sql error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create venue".to_string(),
            )
        })?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "venue": venue }))))
}
