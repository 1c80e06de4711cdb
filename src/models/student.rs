use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_number: Option<String>,
    pub department: Option<String>,
}

impl Student {
    /// A student takes part in allocation only with a department on file.
    pub fn is_eligible(&self) -> bool {
        self.department
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Roll used for deterministic ordering; blank rolls sort first.
    pub fn roll_for_sort(&self) -> &str {
        self.roll_number.as_deref().unwrap_or("")
    }
}
