use crate::database::Database;
use crate::models::{Exam, NewSeating, NewVenue, Seating, Student, Venue};

use super::SeatingStore;

impl SeatingStore for Database {
    async fn find_exam(&self, exam_id: i64) -> Result<Option<Exam>, sqlx::Error> {
        sqlx::query_as::<_, Exam>(
            "SELECT id, title, department, exam_type, exam_date FROM exams WHERE id = $1",
        )
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_eligible_students(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Student>, sqlx::Error> {
        match department {
            Some(dept) => {
                sqlx::query_as::<_, Student>(
                    r#"
                    SELECT id, name, roll_number, department
                    FROM students
                    WHERE department IS NOT NULL
                      AND btrim(department) <> ''
                      AND upper(btrim(department)) = upper(btrim($1))
                    ORDER BY roll_number ASC NULLS FIRST, id
                    "#,
                )
                .bind(dept)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Student>(
                    r#"
                    SELECT id, name, roll_number, department
                    FROM students
                    WHERE department IS NOT NULL
                      AND btrim(department) <> ''
                    ORDER BY roll_number ASC NULLS FIRST, id
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn find_student_by_roll(&self, roll: &str) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            "SELECT id, name, roll_number, department FROM students WHERE roll_number = $1",
        )
        .bind(roll)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_students_by_roll_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, roll_number, department
            FROM students
            WHERE roll_number BETWEEN $1 AND $2
            ORDER BY roll_number, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_available_venues(&self) -> Result<Vec<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(
            r#"
            SELECT id, name, block, capacity, exam_type, available
            FROM venues
            WHERE available AND capacity > 0
            ORDER BY capacity DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn find_venue_by_name(&self, name: &str) -> Result<Option<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(
            r#"
            SELECT id, name, block, capacity, exam_type, available
            FROM venues
            WHERE lower(btrim(name)) = lower(btrim($1))
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_venue(&self, venue: NewVenue) -> Result<Venue, sqlx::Error> {
        sqlx::query_as::<_, Venue>(
            r#"
            INSERT INTO venues (name, block, capacity, exam_type, available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, block, capacity, exam_type, available
            "#,
        )
        .bind(venue.name)
        .bind(venue.block)
        .bind(venue.capacity)
        .bind(venue.exam_type)
        .bind(venue.available)
        .fetch_one(&self.pool)
        .await
    }

    async fn replace_seatings(
        &self,
        exam_id: i64,
        rows: Vec<NewSeating>,
    ) -> Result<Vec<Seating>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM seatings WHERE exam_id = $1")
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(rows.len());
        for row in rows {
            let seating = sqlx::query_as::<_, Seating>(
                r#"
                INSERT INTO seatings (exam_id, venue_id, student_id, seat_label)
                VALUES ($1, $2, $3, $4)
                RETURNING id, exam_id, venue_id, student_id, seat_label
                "#,
            )
            .bind(row.exam_id)
            .bind(row.venue_id)
            .bind(row.student_id)
            .bind(row.seat_label)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(seating);
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_seatings_for_exam(&self, exam_id: i64) -> Result<u64, sqlx::Error> {
        let res = sqlx::query("DELETE FROM seatings WHERE exam_id = $1")
            .bind(exam_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn seatings_for_exam(&self, exam_id: i64) -> Result<Vec<Seating>, sqlx::Error> {
        sqlx::query_as::<_, Seating>(
            r#"
            SELECT id, exam_id, venue_id, student_id, seat_label
            FROM seatings
            WHERE exam_id = $1
            ORDER BY id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn seatings_for_venue(&self, venue_id: i64) -> Result<Vec<Seating>, sqlx::Error> {
        sqlx::query_as::<_, Seating>(
            r#"
            SELECT id, exam_id, venue_id, student_id, seat_label
            FROM seatings
            WHERE venue_id = $1
            ORDER BY id
            "#,
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn seatings_for_student(&self, student_id: i64) -> Result<Vec<Seating>, sqlx::Error> {
        sqlx::query_as::<_, Seating>(
            r#"
            SELECT id, exam_id, venue_id, student_id, seat_label
            FROM seatings
            WHERE student_id = $1
            ORDER BY id
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
    }
}
