//! Manual CSV seat allocation.
//!
//! Expected columns: `RollNoOrRange, VenueName, [SeatNumber]`. A roll spec
//! is either a single roll number or an inclusive range written as
//! `START-END` / `START=END`. Unknown venues are auto-created with stock
//! defaults. The import is all-or-nothing: every line is validated first,
//! any error fails the whole upload and nothing is written.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::error::AllocationError;
use crate::models::{NewSeating, NewVenue, Seating, Venue};
use crate::store::SeatingStore;

pub async fn import_manual_allocations<S: SeatingStore>(
    store: &S,
    exam_id: i64,
    content: &str,
) -> Result<Vec<Seating>, AllocationError> {
    store
        .find_exam(exam_id)
        .await?
        .ok_or(AllocationError::ExamNotFound(exam_id))?;

    let mut allocations: Vec<NewSeating> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    // Venues resolved or created earlier in this import, by lower-cased name.
    let mut venue_cache: HashMap<String, Venue> = HashMap::new();
    let mut first_data_line = true;

    for (idx, raw_line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = if line_num == 1 {
            raw_line.trim_start_matches('\u{feff}')
        } else {
            raw_line
        };
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line);
        let roll_spec = fields[0].trim();

        // Header row heuristic, first data line only; a bare header such
        // as a lone "RollNo" must be skipped before the column-count check.
        if first_data_line && roll_spec.to_lowercase().starts_with("roll") {
            first_data_line = false;
            continue;
        }
        first_data_line = false;

        if fields.len() < 2 {
            errors.push(format!("Line {}: insufficient columns", line_num));
            continue;
        }

        let venue_name = fields[1].trim();
        let seat_label = fields
            .get(2)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if roll_spec.is_empty() {
            continue;
        }

        let venue = resolve_venue(store, &mut venue_cache, venue_name).await?;

        let parts: Vec<&str> = roll_spec.split(['-', '=']).collect();
        let students = if parts.len() == 2 {
            let start = parts[0].trim();
            let end = parts[1].trim();
            let matched = store.find_students_by_roll_range(start, end).await?;
            if matched.is_empty() {
                errors.push(format!(
                    "Line {}: No students found in range {} to {}",
                    line_num, start, end
                ));
                continue;
            }
            matched
        } else {
            match store.find_student_by_roll(roll_spec).await? {
                Some(s) => vec![s],
                None => {
                    errors.push(format!("Line {}: Student {} not found.", line_num, roll_spec));
                    continue;
                }
            }
        };

        for student in students {
            // A range shares the one given seat label across every matched
            // student; auto-seating for ranges is handled elsewhere.
            allocations.push(NewSeating {
                exam_id,
                venue_id: venue.id,
                student_id: student.id,
                seat_label: seat_label.clone(),
            });
        }
    }

    if !errors.is_empty() {
        return Err(AllocationError::ValidationFailed(errors));
    }
    if allocations.is_empty() {
        return Err(AllocationError::EmptyFile);
    }

    // The same student on a later line overrides an earlier one; the
    // (exam_id, student_id) unique constraint admits only one row.
    let mut seen: HashSet<i64> = HashSet::new();
    let mut deduped: Vec<NewSeating> = Vec::with_capacity(allocations.len());
    for row in allocations.into_iter().rev() {
        if seen.insert(row.student_id) {
            deduped.push(row);
        }
    }
    deduped.reverse();

    info!(exam_id, rows = deduped.len(), "importing manual seat allocations");
    let saved = store.replace_seatings(exam_id, deduped).await?;
    Ok(saved)
}

/// Splits on comma; when that yields fewer than 3 fields, semicolon is
/// tried and wins only if it produces more fields.
fn split_fields(line: &str) -> Vec<&str> {
    let by_comma: Vec<&str> = line.split(',').collect();
    if by_comma.len() >= 3 {
        return by_comma;
    }
    let by_semicolon: Vec<&str> = line.split(';').collect();
    if by_semicolon.len() > by_comma.len() {
        by_semicolon
    } else {
        by_comma
    }
}

/// Case-insensitive venue lookup by trimmed name; misses auto-create a
/// venue that later lines of the same import reuse.
async fn resolve_venue<S: SeatingStore>(
    store: &S,
    cache: &mut HashMap<String, Venue>,
    name: &str,
) -> Result<Venue, sqlx::Error> {
    let key = name.trim().to_lowercase();
    if let Some(venue) = cache.get(&key) {
        return Ok(venue.clone());
    }
    let venue = match store.find_venue_by_name(name).await? {
        Some(v) => v,
        None => store.create_venue(NewVenue::auto_created(name)).await?,
    };
    cache.insert(key, venue.clone());
    Ok(venue)
}
