//! Domain ports for the hexagonal boundary.
//!
//! Driven port: [`StudentRepository`], implemented by persistence adapters.
//! Driving ports: [`StudentsQuery`] and [`StudentsCommand`], implemented by
//! [`crate::domain::StudentService`] and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod student_repository;
mod students_command;
mod students_query;

#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{
    FixtureStudentRepository, StudentRepository, StudentRepositoryError,
};
#[cfg(test)]
pub use students_command::MockStudentsCommand;
pub use students_command::{DeleteOutcome, StudentsCommand};
#[cfg(test)]
pub use students_query::MockStudentsQuery;
pub use students_query::StudentsQuery;
