pub mod exam;
pub mod student;
pub mod venue;
pub mod seating;

pub use exam::Exam;
pub use student::Student;
pub use venue::{NewVenue, Venue};
pub use seating::{NewSeating, Seating};
