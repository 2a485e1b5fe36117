//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed school records and the use-cases the
//! inbound adapters drive. Nothing in here knows about HTTP or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - Student, StudentId, PersonName, StudentDraft, StudentChanges — student
//!   records and the allow-listed inputs that create or modify them.
//! - Enrollment, Course, Grade — read-only association shown on detail pages.
//! - StudentSortOrder — ordering tokens accepted by the listing.
//! - StudentService — implementation of the driving ports in [`ports`].

pub mod enrollment;
pub mod error;
pub mod ports;
pub mod sort_order;
pub mod student;
pub mod student_service;
pub mod trace_id;

pub use self::enrollment::{Course, Enrollment, Grade, GradeParseError};
pub use self::error::{Error, ErrorCode};
pub use self::sort_order::StudentSortOrder;
pub use self::student::{
    NAME_MAX, PersonName, Student, StudentChanges, StudentDraft, StudentId, StudentValidationError,
};
pub use self::student_service::StudentService;
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
