use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub block: String,
    pub capacity: i32,
    pub exam_type: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVenue {
    pub name: String,
    pub block: String,
    pub capacity: i32,
    pub exam_type: String,
    pub available: bool,
}

impl NewVenue {
    /// Defaults used when the CSV importer references a venue that does not
    /// exist yet.
    pub fn auto_created(name: &str) -> Self {
        NewVenue {
            name: name.to_string(),
            block: "Allocated Block".to_string(),
            capacity: 100,
            exam_type: "All".to_string(),
            available: true,
        }
    }
}
