pub mod postgres;

#[cfg(test)]
pub mod memory;

use std::future::Future;

use crate::models::{Exam, NewSeating, NewVenue, Seating, Student, Venue};

/// Storage contract consumed by the allocation engine and the CSV importer.
///
/// Implemented for [`crate::database::Database`] with raw sqlx queries; the
/// tests run the same services against an in-memory implementation, which is
/// possible because the engine itself is pure and deterministic.
pub trait SeatingStore: Send + Sync {
    fn find_exam(
        &self,
        exam_id: i64,
    ) -> impl Future<Output = Result<Option<Exam>, sqlx::Error>> + Send;

    /// Students with a non-blank department, optionally scoped to one
    /// department (trimmed, case-insensitive).
    fn find_eligible_students(
        &self,
        department: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Student>, sqlx::Error>> + Send;

    fn find_student_by_roll(
        &self,
        roll: &str,
    ) -> impl Future<Output = Result<Option<Student>, sqlx::Error>> + Send;

    /// Inclusive lexical bound on roll number, the way the database orders
    /// text. Roll numbers are not assumed numeric.
    fn find_students_by_roll_range(
        &self,
        start: &str,
        end: &str,
    ) -> impl Future<Output = Result<Vec<Student>, sqlx::Error>> + Send;

    /// Available venues with positive capacity, largest first.
    fn find_available_venues(
        &self,
    ) -> impl Future<Output = Result<Vec<Venue>, sqlx::Error>> + Send;

    fn find_venue_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Venue>, sqlx::Error>> + Send;

    fn create_venue(
        &self,
        venue: NewVenue,
    ) -> impl Future<Output = Result<Venue, sqlx::Error>> + Send;

    /// Replaces every seating of an exam in one transaction: the delete
    /// strictly precedes the inserts so the (exam_id, student_id) unique
    /// constraint cannot trip on re-runs, and a failure after the delete
    /// rolls the prior seatings back.
    fn replace_seatings(
        &self,
        exam_id: i64,
        rows: Vec<NewSeating>,
    ) -> impl Future<Output = Result<Vec<Seating>, sqlx::Error>> + Send;

    fn delete_seatings_for_exam(
        &self,
        exam_id: i64,
    ) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;

    fn seatings_for_exam(
        &self,
        exam_id: i64,
    ) -> impl Future<Output = Result<Vec<Seating>, sqlx::Error>> + Send;

    fn seatings_for_venue(
        &self,
        venue_id: i64,
    ) -> impl Future<Output = Result<Vec<Seating>, sqlx::Error>> + Send;

    fn seatings_for_student(
        &self,
        student_id: i64,
    ) -> impl Future<Output = Result<Vec<Seating>, sqlx::Error>> + Send;
}
