//! HTTP inbound adapter serving the student pages.

pub mod error;
pub mod health;
pub mod session;
pub mod state;
pub mod student_forms;
pub mod student_views;
pub mod students;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
