//! Student domain service.
//!
//! Implements the driving ports on top of a [`StudentRepository`], mapping
//! repository failures onto domain errors. Every method is one unit of
//! work against the repository; no state survives between calls.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    DeleteOutcome, StudentRepository, StudentRepositoryError, StudentsCommand, StudentsQuery,
};
use crate::domain::{Error, Student, StudentChanges, StudentDraft, StudentId, StudentSortOrder};

/// Student service implementing [`StudentsQuery`] and [`StudentsCommand`].
#[derive(Clone)]
pub struct StudentService<R> {
    repository: Arc<R>,
}

impl<R> StudentService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_repository_error(error: StudentRepositoryError) -> Error {
    match error {
        StudentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("student repository unavailable: {message}"))
        }
        StudentRepositoryError::Query { message } => {
            Error::internal(format!("student repository error: {message}"))
        }
        StudentRepositoryError::Constraint { message } => {
            Error::internal(format!("student write rejected: {message}"))
        }
    }
}

fn student_not_found(id: StudentId) -> Error {
    Error::not_found(format!("student {id} not found"))
}

#[async_trait]
impl<R> StudentsQuery for StudentService<R>
where
    R: StudentRepository,
{
    async fn list_students(&self, order: StudentSortOrder) -> Result<Vec<Student>, Error> {
        self.repository
            .list(order)
            .await
            .map_err(map_repository_error)
    }

    async fn student_details(&self, id: StudentId) -> Result<Option<Student>, Error> {
        self.repository
            .find_with_enrollments(id)
            .await
            .map_err(map_repository_error)
    }

    async fn find_student(&self, id: StudentId) -> Result<Option<Student>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> StudentsCommand for StudentService<R>
where
    R: StudentRepository,
{
    async fn create_student(&self, draft: StudentDraft) -> Result<Student, Error> {
        let student = self
            .repository
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(student_id = %student.id(), "student created");
        Ok(student)
    }

    async fn update_student(
        &self,
        id: StudentId,
        changes: StudentChanges,
    ) -> Result<Student, Error> {
        let mut student = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| student_not_found(id))?;

        if changes.is_empty() {
            debug!(student_id = %id, "update carried no editable fields");
        }
        student.apply(changes);

        let updated = self
            .repository
            .update(&student)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(student_not_found(id));
        }
        info!(student_id = %id, "student updated");
        Ok(student)
    }

    async fn delete_student(&self, id: StudentId) -> Result<DeleteOutcome, Error> {
        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        if existing.is_none() {
            debug!(student_id = %id, "delete requested for absent student");
            return Ok(DeleteOutcome::AlreadyAbsent);
        }

        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            info!(student_id = %id, "student deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::AlreadyAbsent)
        }
    }
}

#[cfg(test)]
#[path = "student_service_tests.rs"]
mod tests;
