//! Driving port for student mutations.

use async_trait::async_trait;

use crate::domain::{Error, Student, StudentChanges, StudentDraft, StudentId};

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record existed and was removed.
    Deleted,
    /// No record matched; nothing to do.
    AlreadyAbsent,
}

/// Write-side use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentsCommand: Send + Sync {
    /// Insert a student built from allow-listed fields.
    async fn create_student(&self, draft: StudentDraft) -> Result<Student, Error>;

    /// Apply allow-listed changes to an existing student and commit.
    ///
    /// Returns [`crate::domain::ErrorCode::NotFound`] when the student does
    /// not exist.
    async fn update_student(&self, id: StudentId, changes: StudentChanges)
    -> Result<Student, Error>;

    /// Remove a student. Absence is not an error.
    async fn delete_student(&self, id: StudentId) -> Result<DeleteOutcome, Error>;
}
