use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One allocated seat. At most one row per (exam_id, student_id), enforced
/// by a unique constraint; re-running allocation for an exam replaces the
/// whole set.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seating {
    pub id: i64,
    pub exam_id: i64,
    pub venue_id: i64,
    pub student_id: i64,
    pub seat_label: Option<String>,
}

/// A seating row ready to insert (id assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeating {
    pub exam_id: i64,
    pub venue_id: i64,
    pub student_id: i64,
    pub seat_label: Option<String>,
}
