//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{StudentRepository, StudentsCommand, StudentsQuery};
use crate::domain::StudentService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub students: Arc<dyn StudentsQuery>,
    pub student_commands: Arc<dyn StudentsCommand>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(students: Arc<dyn StudentsQuery>, student_commands: Arc<dyn StudentsCommand>) -> Self {
        Self {
            students,
            student_commands,
        }
    }

    /// Wire both ports to one [`StudentService`] over `repository`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use school::domain::ports::FixtureStudentRepository;
    /// use school::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::from_repository(Arc::new(FixtureStudentRepository::new()));
    /// let _query = state.students.clone();
    /// ```
    pub fn from_repository<R>(repository: Arc<R>) -> Self
    where
        R: StudentRepository + 'static,
    {
        let service = Arc::new(StudentService::new(repository));
        Self::new(service.clone(), service)
    }
}
