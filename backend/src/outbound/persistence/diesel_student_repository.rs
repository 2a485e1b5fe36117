//! PostgreSQL-backed `StudentRepository` implementation using Diesel ORM.
//!
//! Each method checks out one pooled connection, runs its statements and
//! returns; autocommit makes every mutation durable before the call returns.
//! The enrollment graph read runs in a read-only transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{
    Course, Enrollment, Grade, PersonName, Student, StudentDraft, StudentId, StudentSortOrder,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CourseRow, EnrollmentRow, NewStudentRow, StudentChangeset, StudentRow};
use super::pool::DbPool;
use super::schema::{courses, enrollments, students};

/// Diesel-backed implementation of the [`StudentRepository`] port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_student(row: StudentRow) -> Result<Student, StudentRepositoryError> {
    let invalid = |err: crate::domain::StudentValidationError| {
        StudentRepositoryError::query(format!("stored student {} is invalid: {err}", row.id))
    };
    let id = StudentId::new(row.id).map_err(invalid)?;
    let draft = StudentDraft {
        last_name: PersonName::new(row.last_name.as_str()).map_err(invalid)?,
        first_name: PersonName::new(row.first_name.as_str()).map_err(invalid)?,
        enrollment_date: row.enrollment_date,
    };
    Ok(Student::new(id, draft))
}

fn row_to_enrollment(student_id: StudentId, row: EnrollmentRow, course: CourseRow) -> Enrollment {
    let grade = row.grade.as_deref().and_then(|raw| match raw.parse::<Grade>() {
        Ok(grade) => Some(grade),
        Err(error) => {
            warn!(enrollment_id = row.id, %error, "ignoring unknown stored grade");
            None
        }
    });
    Enrollment {
        id: row.id,
        course_id: row.course_id,
        student_id,
        grade,
        course: Course {
            id: course.id,
            title: course.title,
            credits: course.credits,
        },
    }
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn list(&self, order: StudentSortOrder) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = students::table.select(StudentRow::as_select());

        let rows: Vec<StudentRow> = match order {
            StudentSortOrder::EnrollmentDateDesc => {
                query
                    .order((students::enrollment_date.desc(), students::id.asc()))
                    .load::<StudentRow>(&mut conn)
                    .await
            }
            StudentSortOrder::LastNameDesc => {
                query
                    .order((students::last_name.desc(), students::id.asc()))
                    .load::<StudentRow>(&mut conn)
                    .await
            }
            StudentSortOrder::FirstNameDesc => {
                query
                    .order((students::first_name.desc(), students::id.asc()))
                    .load::<StudentRow>(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_student).collect()
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StudentRow> = students::table
            .find(id.get())
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_student).transpose()
    }

    async fn find_with_enrollments(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Both reads share one snapshot so a concurrent delete cannot pair a
        // student with a half-removed enrollment graph.
        let loaded: Option<(StudentRow, Vec<(EnrollmentRow, CourseRow)>)> = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let row: Option<StudentRow> = students::table
                        .find(id.get())
                        .select(StudentRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let enrollment_rows = enrollments::table
                        .inner_join(courses::table)
                        .filter(enrollments::student_id.eq(id.get()))
                        .order(enrollments::id.asc())
                        .select((EnrollmentRow::as_select(), CourseRow::as_select()))
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some((row, enrollment_rows)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((row, enrollment_rows)) = loaded else {
            return Ok(None);
        };
        let student = row_to_student(row)?;
        let enrollments = enrollment_rows
            .into_iter()
            .map(|(enrollment, course)| row_to_enrollment(id, enrollment, course))
            .collect();
        Ok(Some(student.with_enrollments(enrollments)))
    }

    async fn insert(&self, draft: &StudentDraft) -> Result<Student, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewStudentRow {
            last_name: draft.last_name.as_str(),
            first_name: draft.first_name.as_str(),
            enrollment_date: draft.enrollment_date,
        };
        let row: StudentRow = diesel::insert_into(students::table)
            .values(&new_row)
            .returning(StudentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_student(row)
    }

    async fn update(&self, student: &Student) -> Result<bool, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = StudentChangeset {
            last_name: student.last_name().as_str(),
            first_name: student.first_name().as_str(),
            enrollment_date: student.enrollment_date(),
        };
        let updated = diesel::update(students::table.find(student.id().get()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(students::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn student_row(id: i32, last_name: &str) -> StudentRow {
        StudentRow {
            id,
            last_name: last_name.to_owned(),
            first_name: "Ana".to_owned(),
            enrollment_date: NaiveDate::from_ymd_opt(2023, 9, 1).expect("valid date"),
        }
    }

    #[rstest]
    fn rows_convert_to_students() {
        let student = row_to_student(student_row(5, "Lee")).expect("valid row");
        assert_eq!(student.id().get(), 5);
        assert_eq!(student.last_name().as_str(), "Lee");
        assert!(student.enrollments().is_empty());
    }

    #[rstest]
    #[case(0, "Lee")]
    #[case(5, "")]
    fn invalid_rows_are_query_errors(#[case] id: i32, #[case] last_name: &str) {
        let err = row_to_student(student_row(id, last_name)).expect_err("invalid row");
        assert!(matches!(err, StudentRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(Some("A"), Some(Grade::A))]
    #[case(None, None)]
    #[case(Some("Z"), None)]
    fn enrollment_rows_carry_course_and_grade(
        #[case] raw_grade: Option<&str>,
        #[case] expected: Option<Grade>,
    ) {
        let student_id = StudentId::new(5).expect("valid id");
        let enrollment = row_to_enrollment(
            student_id,
            EnrollmentRow {
                id: 1,
                course_id: 1050,
                student_id: 5,
                grade: raw_grade.map(str::to_owned),
            },
            CourseRow {
                id: 1050,
                title: "Chemistry".to_owned(),
                credits: 3,
            },
        );
        assert_eq!(enrollment.grade, expected);
        assert_eq!(enrollment.course.title, "Chemistry");
        assert_eq!(enrollment.student_id, student_id);
    }
}
