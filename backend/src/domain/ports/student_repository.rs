//! Port for student persistence.
//!
//! The [`StudentRepository`] trait is the persistence gateway: ordered
//! listing, single reads (with or without the enrollment graph) and the three
//! mutations. Each call is one unit of work; adapters commit before
//! returning.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{Enrollment, Student, StudentDraft, StudentId, StudentSortOrder};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "student repository query failed: {message}",
        /// The store rejected a write because it violates a constraint.
        Constraint { message: String } =>
            "student repository constraint violated: {message}",
    }
}

/// Port for student storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Return every student in the requested order. Ties are broken by
    /// identity ascending.
    async fn list(&self, order: StudentSortOrder) -> Result<Vec<Student>, StudentRepositoryError>;

    /// Fetch one student without its enrollments.
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError>;

    /// Fetch one student together with its enrollments and each
    /// enrollment's course.
    async fn find_with_enrollments(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError>;

    /// Insert a new student and return it with its store-assigned identity.
    async fn insert(&self, draft: &StudentDraft) -> Result<Student, StudentRepositoryError>;

    /// Persist the editable fields of an existing student.
    ///
    /// Returns `false` when no row matched the identity.
    async fn update(&self, student: &Student) -> Result<bool, StudentRepositoryError>;

    /// Remove a student.
    ///
    /// Returns `false` when no row matched the identity.
    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError>;
}

#[derive(Debug, Default)]
struct FixtureState {
    last_id: i32,
    students: BTreeMap<StudentId, Student>,
    enrollments: Vec<Enrollment>,
}

/// In-memory implementation used when no database is configured and in
/// tests.
///
/// Clones share the same underlying state, so a test can keep a handle for
/// seeding and assertions while a service owns another.
#[derive(Debug, Default, Clone)]
pub struct FixtureStudentRepository {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureStudentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Store a student under its own identity, replacing any existing record.
    pub fn seed(&self, student: Student) {
        let mut state = self.lock();
        let id = student.id();
        state.last_id = state.last_id.max(id.get());
        state.students.insert(id, student.with_enrollments(Vec::new()));
    }

    /// Store an enrollment. The owning student does not need to exist yet.
    pub fn seed_enrollment(&self, enrollment: Enrollment) {
        self.lock().enrollments.push(enrollment);
    }

    /// Copy of every stored student, ordered by identity.
    pub fn snapshot(&self) -> Vec<Student> {
        self.lock().students.values().cloned().collect()
    }

    /// Copy of the enrollments stored for one student.
    pub fn enrollments_for(&self, id: StudentId) -> Vec<Enrollment> {
        self.lock()
            .enrollments
            .iter()
            .filter(|enrollment| enrollment.student_id == id)
            .cloned()
            .collect()
    }
}

fn sort_students(students: &mut [Student], order: StudentSortOrder) {
    students.sort_by(|left, right| {
        let primary = match order {
            StudentSortOrder::EnrollmentDateDesc => {
                right.enrollment_date().cmp(&left.enrollment_date())
            }
            StudentSortOrder::LastNameDesc => right.last_name().cmp(left.last_name()),
            StudentSortOrder::FirstNameDesc => right.first_name().cmp(left.first_name()),
        };
        primary.then_with(|| left.id().cmp(&right.id()))
    });
}

#[async_trait]
impl StudentRepository for FixtureStudentRepository {
    async fn list(&self, order: StudentSortOrder) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut students = self.snapshot();
        sort_students(&mut students, order);
        Ok(students)
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        Ok(self.lock().students.get(&id).cloned())
    }

    async fn find_with_enrollments(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let student = self.lock().students.get(&id).cloned();
        Ok(student.map(|student| student.with_enrollments(self.enrollments_for(id))))
    }

    async fn insert(&self, draft: &StudentDraft) -> Result<Student, StudentRepositoryError> {
        let mut state = self.lock();
        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| StudentRepositoryError::constraint("student id sequence exhausted"))?;
        let id = StudentId::new(next)
            .map_err(|err| StudentRepositoryError::constraint(err.to_string()))?;
        state.last_id = next;
        let student = Student::new(id, draft.clone());
        state.students.insert(id, student.clone());
        Ok(student)
    }

    async fn update(&self, student: &Student) -> Result<bool, StudentRepositoryError> {
        let mut state = self.lock();
        match state.students.get_mut(&student.id()) {
            Some(stored) => {
                *stored = student.clone().with_enrollments(Vec::new());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut state = self.lock();
        let removed = state.students.remove(&id).is_some();
        if removed {
            // Mirrors the ON DELETE CASCADE foreign key.
            state.enrollments.retain(|enrollment| enrollment.student_id != id);
        }
        Ok(removed)
    }
}
