use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the allocation engine and the manual importer.
///
/// Configuration errors name the missing precondition so an operator can
/// fix the data and re-run; validation errors aggregate every bad CSV line
/// and nothing is written when they fire.
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Exam not found: {0}")]
    ExamNotFound(i64),

    #[error(
        "No eligible students found for this exam. \
         Ensure students have their Department set in their profile."
    )]
    NoEligibleStudents,

    #[error("No available venues found. Please add venues in the Venues section first.")]
    NoAvailableVenues,

    #[error("Could not build any seat allocations. Check student data.")]
    EmptyAllocationResult,

    #[error("No valid data found in CSV. Check format.")]
    EmptyFile,

    #[error("Validation failed. Errors: {}", format_line_errors(.0))]
    ValidationFailed(Vec<String>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// First 5 line errors joined, remainder counted.
fn format_line_errors(errors: &[String]) -> String {
    let mut msg = errors
        .iter()
        .take(5)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if errors.len() > 5 {
        msg.push_str(&format!("... ({} more errors)", errors.len() - 5));
    }
    msg
}

impl IntoResponse for AllocationError {
    fn into_response(self) -> Response {
        let status = match self {
            AllocationError::ExamNotFound(_) => StatusCode::NOT_FOUND,
            AllocationError::NoEligibleStudents
            | AllocationError::NoAvailableVenues
            | AllocationError::EmptyAllocationResult => StatusCode::UNPROCESSABLE_ENTITY,
            AllocationError::EmptyFile | AllocationError::ValidationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AllocationError::Database(ref e) => {
                tracing::error!("allocation sql error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
