//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{courses, enrollments, students};

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub enrollment_date: NaiveDate,
}

/// Insertable struct for new students. The identity comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub enrollment_date: NaiveDate,
}

/// Changeset restricted to the editable student columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = students)]
pub(crate) struct StudentChangeset<'a> {
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub enrollment_date: NaiveDate,
}

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i32,
    pub title: String,
    pub credits: i32,
}

/// Row struct for reading from the enrollments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: i32,
    pub course_id: i32,
    pub student_id: i32,
    pub grade: Option<String>,
}
