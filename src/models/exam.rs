use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    /// Non-blank department scopes the exam to that department ("internal"
    /// exam); blank or NULL means every department sits it.
    pub department: Option<String>,
    pub exam_type: String,
    pub exam_date: Option<NaiveDate>,
}

impl Exam {
    /// Normalized department scope, or None for a semester-wide exam.
    pub fn department_scope(&self) -> Option<&str> {
        match self.department.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(d),
            _ => None,
        }
    }
}
