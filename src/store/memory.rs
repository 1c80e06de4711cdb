//! In-memory [`SeatingStore`] used by the service tests. Mirrors the
//! semantics of the Postgres implementation: lexical roll ranges,
//! trimmed/case-insensitive venue lookup, atomic replace, and the
//! (exam_id, student_id) unique constraint.

use std::sync::Mutex;

use crate::models::{Exam, NewSeating, NewVenue, Seating, Student, Venue};

use super::SeatingStore;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    exams: Vec<Exam>,
    students: Vec<Student>,
    venues: Vec<Venue>,
    seatings: Vec<Seating>,
    next_venue_id: i64,
    next_seating_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                next_venue_id: 1,
                next_seating_id: 1,
                ..Inner::default()
            }),
        }
    }

    pub fn add_exam(&self, id: i64, title: &str, department: Option<&str>) {
        self.inner.lock().unwrap().exams.push(Exam {
            id,
            title: title.to_string(),
            department: department.map(str::to_string),
            exam_type: "Internal".to_string(),
            exam_date: None,
        });
    }

    pub fn add_student(&self, id: i64, roll: Option<&str>, department: Option<&str>) {
        self.inner.lock().unwrap().students.push(Student {
            id,
            name: format!("Student {}", id),
            roll_number: roll.map(str::to_string),
            department: department.map(str::to_string),
        });
    }

    pub fn add_venue(&self, name: &str, capacity: i32, available: bool) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_venue_id;
        inner.next_venue_id += 1;
        inner.venues.push(Venue {
            id,
            name: name.to_string(),
            block: "Main Block".to_string(),
            capacity,
            exam_type: "All".to_string(),
            available,
        });
        id
    }
}

fn is_eligible(student: &Student, department: Option<&str>) -> bool {
    let Some(dept) = student.department.as_deref().map(str::trim) else {
        return false;
    };
    if dept.is_empty() {
        return false;
    }
    match department {
        Some(filter) => dept.eq_ignore_ascii_case(filter.trim()),
        None => true,
    }
}

impl SeatingStore for MemoryStore {
    async fn find_exam(&self, exam_id: i64) -> Result<Option<Exam>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.exams.iter().find(|e| e.id == exam_id).cloned())
    }

    async fn find_eligible_students(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut students: Vec<Student> = inner
            .students
            .iter()
            .filter(|s| is_eligible(s, department))
            .cloned()
            .collect();
        students.sort_by(|a, b| {
            a.roll_for_sort()
                .cmp(b.roll_for_sort())
                .then(a.id.cmp(&b.id))
        });
        Ok(students)
    }

    async fn find_student_by_roll(&self, roll: &str) -> Result<Option<Student>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .students
            .iter()
            .find(|s| s.roll_number.as_deref() == Some(roll))
            .cloned())
    }

    async fn find_students_by_roll_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut students: Vec<Student> = inner
            .students
            .iter()
            .filter(|s| {
                s.roll_number
                    .as_deref()
                    .is_some_and(|r| r >= start && r <= end)
            })
            .cloned()
            .collect();
        students.sort_by(|a, b| {
            a.roll_for_sort()
                .cmp(b.roll_for_sort())
                .then(a.id.cmp(&b.id))
        });
        Ok(students)
    }

    async fn find_available_venues(&self) -> Result<Vec<Venue>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut venues: Vec<Venue> = inner
            .venues
            .iter()
            .filter(|v| v.available && v.capacity > 0)
            .cloned()
            .collect();
        venues.sort_by(|a, b| b.capacity.cmp(&a.capacity).then(a.id.cmp(&b.id)));
        Ok(venues)
    }

    async fn find_venue_by_name(&self, name: &str) -> Result<Option<Venue>, sqlx::Error> {
        let needle = name.trim().to_lowercase();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .venues
            .iter()
            .find(|v| v.name.trim().to_lowercase() == needle)
            .cloned())
    }

    async fn create_venue(&self, venue: NewVenue) -> Result<Venue, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_venue_id;
        inner.next_venue_id += 1;
        let venue = Venue {
            id,
            name: venue.name,
            block: venue.block,
            capacity: venue.capacity,
            exam_type: venue.exam_type,
            available: venue.available,
        };
        inner.venues.push(venue.clone());
        Ok(venue)
    }

    async fn replace_seatings(
        &self,
        exam_id: i64,
        rows: Vec<NewSeating>,
    ) -> Result<Vec<Seating>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();

        // Unique (exam_id, student_id) check, as the database would enforce.
        for (i, a) in rows.iter().enumerate() {
            for b in rows.iter().skip(i + 1) {
                if a.exam_id == b.exam_id && a.student_id == b.student_id {
                    return Err(sqlx::Error::Protocol(format!(
                        "duplicate seating for exam {} student {}",
                        a.exam_id, a.student_id
                    )));
                }
            }
        }

        inner.seatings.retain(|s| s.exam_id != exam_id);
        let mut saved = Vec::with_capacity(rows.len());
        for row in rows {
            let id = inner.next_seating_id;
            inner.next_seating_id += 1;
            let seating = Seating {
                id,
                exam_id: row.exam_id,
                venue_id: row.venue_id,
                student_id: row.student_id,
                seat_label: row.seat_label,
            };
            inner.seatings.push(seating.clone());
            saved.push(seating);
        }
        Ok(saved)
    }

    async fn delete_seatings_for_exam(&self, exam_id: i64) -> Result<u64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.seatings.len();
        inner.seatings.retain(|s| s.exam_id != exam_id);
        Ok((before - inner.seatings.len()) as u64)
    }

    async fn seatings_for_exam(&self, exam_id: i64) -> Result<Vec<Seating>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .seatings
            .iter()
            .filter(|s| s.exam_id == exam_id)
            .cloned()
            .collect())
    }

    async fn seatings_for_venue(&self, venue_id: i64) -> Result<Vec<Seating>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .seatings
            .iter()
            .filter(|s| s.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn seatings_for_student(&self, student_id: i64) -> Result<Vec<Seating>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .seatings
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect())
    }
}
