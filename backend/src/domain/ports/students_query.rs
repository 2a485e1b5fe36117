//! Driving port for student reads.

use async_trait::async_trait;

use crate::domain::{Error, Student, StudentId, StudentSortOrder};

/// Read-side use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentsQuery: Send + Sync {
    /// List every student in the requested order.
    async fn list_students(&self, order: StudentSortOrder) -> Result<Vec<Student>, Error>;

    /// Fetch a student with enrollments and courses for the detail page.
    async fn student_details(&self, id: StudentId) -> Result<Option<Student>, Error>;

    /// Fetch a student without its enrollments (edit and delete pages).
    async fn find_student(&self, id: StudentId) -> Result<Option<Student>, Error>;
}
