//! Automatic seat allocation.
//!
//! Pipeline: eligible students -> one FIFO queue per department ->
//! max-heap interleave (spread same-department students as far apart as
//! possible) -> pack into venues largest-first with row/column seat labels
//! -> replace the exam's previous seatings in one transaction.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashSet, VecDeque};

use tracing::info;

use crate::error::AllocationError;
use crate::models::{NewSeating, Seating, Student, Venue};
use crate::store::SeatingStore;

/// Runs the full automatic allocation for an exam and replaces its
/// previous seatings. Re-running with unchanged data yields an identical
/// result: every tie-break below is deterministic.
pub async fn auto_allocate<S: SeatingStore>(
    store: &S,
    exam_id: i64,
) -> Result<Vec<Seating>, AllocationError> {
    let exam = store
        .find_exam(exam_id)
        .await?
        .ok_or(AllocationError::ExamNotFound(exam_id))?;

    // A non-blank exam department scopes eligibility (internal exam);
    // otherwise every department sits it (semester exam).
    let scope = exam.department_scope().map(str::to_string);
    let students = store.find_eligible_students(scope.as_deref()).await?;

    let mut queues = build_department_queues(students, scope.as_deref())?;
    let departments = queues.len();
    let ordered = interleave_departments(&mut queues);

    let venues = store.find_available_venues().await?;
    let plan = pack_into_venues(exam_id, &ordered, &venues)?;

    info!(
        exam_id,
        students = ordered.len(),
        departments,
        venues = venues.len(),
        "auto-allocating exam seating"
    );

    let saved = store.replace_seatings(exam_id, plan).await?;
    Ok(saved)
}

/// Groups eligible students into per-department FIFO queues.
///
/// Department keys are trimmed and upper-cased; within a department,
/// students sort ascending by roll number with blank/NULL rolls first
/// (empty-string substitution), id as the final tie-break. The BTreeMap
/// makes iteration order independent of input order.
pub fn build_department_queues(
    students: Vec<Student>,
    scope: Option<&str>,
) -> Result<BTreeMap<String, VecDeque<Student>>, AllocationError> {
    let scope = scope.map(str::trim).filter(|s| !s.is_empty());

    let eligible: Vec<Student> = students
        .into_iter()
        .filter(|s| s.is_eligible())
        .filter(|s| match scope {
            Some(dept) => s
                .department
                .as_deref()
                .is_some_and(|d| d.trim().eq_ignore_ascii_case(dept)),
            None => true,
        })
        .collect();

    if eligible.is_empty() {
        return Err(AllocationError::NoEligibleStudents);
    }

    let mut by_dept: BTreeMap<String, Vec<Student>> = BTreeMap::new();
    for student in eligible {
        let key = student
            .department
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_uppercase();
        by_dept.entry(key).or_default().push(student);
    }

    let mut queues = BTreeMap::new();
    for (dept, mut group) in by_dept {
        group.sort_by(|a, b| {
            a.roll_for_sort()
                .cmp(b.roll_for_sort())
                .then(a.id.cmp(&b.id))
        });
        queues.insert(dept, VecDeque::from(group));
    }
    Ok(queues)
}

/// Heap entry: department with its remaining queue length. Max by
/// remaining count; ties go to the lexically smaller department key so
/// re-runs are reproducible.
#[derive(Debug, PartialEq, Eq)]
struct DeptEntry {
    remaining: usize,
    dept: String,
}

impl Ord for DeptEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.dept.cmp(&self.dept))
    }
}

impl PartialOrd for DeptEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Task-scheduler interleave across departments.
///
/// Always places a student from the department with the most remaining
/// students that differs from the last placed one; when the head of the
/// heap matches the last department it is parked in a one-slot buffer and
/// the runner-up is used instead. With a single department left the
/// fallback places same-department students back to back, the unavoidable
/// minimum. Greedy by largest remainder is optimal for maximising the
/// minimum same-department gap.
pub fn interleave_departments(queues: &mut BTreeMap<String, VecDeque<Student>>) -> Vec<Student> {
    let mut heap: BinaryHeap<DeptEntry> = queues
        .iter()
        .filter(|(_, q)| !q.is_empty())
        .map(|(dept, q)| DeptEntry {
            remaining: q.len(),
            dept: dept.clone(),
        })
        .collect();

    let total: usize = queues.values().map(VecDeque::len).sum();
    let mut result = Vec::with_capacity(total);
    let mut last_dept: Option<String> = None;
    let mut held: Option<DeptEntry> = None;

    while !heap.is_empty() || held.is_some() {
        let mut curr = heap.pop();

        // Same department as the last seat: park it and try the runner-up.
        if let Some(entry) = curr.as_ref() {
            if last_dept.as_deref() == Some(entry.dept.as_str()) {
                held = curr.take();
                curr = heap.pop();
            }
        }

        // No different department available, use the parked one.
        let curr = match curr.or_else(|| held.take()) {
            Some(entry) => entry,
            None => break,
        };

        if let Some(student) = queues.get_mut(&curr.dept).and_then(VecDeque::pop_front) {
            result.push(student);
        }
        last_dept = Some(curr.dept.clone());

        if let Some(parked) = held.take() {
            heap.push(parked);
        }
        if curr.remaining > 1 {
            heap.push(DeptEntry {
                remaining: curr.remaining - 1,
                dept: curr.dept,
            });
        }
    }

    result
}

/// Max columns per row so seat labels stay readable.
fn columns_for(capacity: i32) -> i32 {
    if capacity <= 30 {
        5
    } else if capacity <= 100 {
        10
    } else {
        12
    }
}

/// Row 0..=25 is A..Z; rows past that get a two-letter AA, AB, ..., BA, ...
/// label. Both letters are reduced mod 26 so any row index a venue capacity
/// can produce stays in A..Z territory.
fn row_label(row: i32) -> String {
    let letter = |n: i32| (b'A' + (n.rem_euclid(26)) as u8) as char;
    if row < 26 {
        letter(row).to_string()
    } else {
        format!("{}{}", letter(row / 26 - 1), letter(row))
    }
}

fn seat_label(filled: i32, cols: i32) -> String {
    let row = filled / cols;
    let col = filled % cols;
    format!("{}{}", row_label(row), col + 1)
}

/// Lays the ordered sequence into venues, largest capacity first. Students
/// beyond total capacity land in the last venue with OVF-n labels so a
/// capacity shortfall is visible instead of silently dropping students.
pub fn pack_into_venues(
    exam_id: i64,
    ordered: &[Student],
    venues: &[Venue],
) -> Result<Vec<NewSeating>, AllocationError> {
    let mut venues: Vec<&Venue> = venues.iter().filter(|v| v.capacity > 0).collect();
    venues.sort_by(|a, b| b.capacity.cmp(&a.capacity).then(a.id.cmp(&b.id)));

    if venues.is_empty() {
        return Err(AllocationError::NoAvailableVenues);
    }

    let mut allocations = Vec::with_capacity(ordered.len());
    let mut seen_students: HashSet<i64> = HashSet::new();
    let mut idx = 0;

    for venue in &venues {
        let cols = columns_for(venue.capacity);
        let mut filled = 0;

        while filled < venue.capacity && idx < ordered.len() {
            let student = &ordered[idx];
            idx += 1;

            // A repeated student in the input must not yield two seatings.
            if !seen_students.insert(student.id) {
                continue;
            }

            allocations.push(NewSeating {
                exam_id,
                venue_id: venue.id,
                student_id: student.id,
                seat_label: Some(seat_label(filled, cols)),
            });
            filled += 1;
        }
        if idx >= ordered.len() {
            break;
        }
    }

    // Overflow beyond total capacity goes to the last (smallest) venue.
    if idx < ordered.len() {
        let last_venue = venues[venues.len() - 1];
        let mut overflow = 1;
        while idx < ordered.len() {
            let student = &ordered[idx];
            idx += 1;
            if !seen_students.insert(student.id) {
                continue;
            }
            allocations.push(NewSeating {
                exam_id,
                venue_id: last_venue.id,
                student_id: student.id,
                seat_label: Some(format!("OVF-{}", overflow)),
            });
            overflow += 1;
        }
    }

    if allocations.is_empty() {
        return Err(AllocationError::EmptyAllocationResult);
    }
    Ok(allocations)
}
