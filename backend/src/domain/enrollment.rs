//! Enrollment association between a student and a course.
//!
//! These records are read-only from the point of view of this service: they
//! are loaded for the student detail page and never written.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use super::StudentId;

/// Letter grade recorded for an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// Raised when a stored grade is not one of the known letters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade: {value}")]
pub struct GradeParseError {
    value: String,
}

impl Grade {
    /// Letter used in storage and views.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            other => Err(GradeParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Course offered by the school. Identities are assigned by the catalogue,
/// not by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub credits: i32,
}

/// Enrollment of one student in one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub id: i32,
    pub course_id: i32,
    pub student_id: StudentId,
    /// `None` until a grade has been awarded.
    pub grade: Option<Grade>,
    pub course: Course,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A", Grade::A)]
    #[case("B", Grade::B)]
    #[case("C", Grade::C)]
    #[case("D", Grade::D)]
    #[case("F", Grade::F)]
    fn grade_parses_known_letters(#[case] raw: &str, #[case] expected: Grade) {
        assert_eq!(raw.parse::<Grade>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("E")]
    #[case("a")]
    #[case("")]
    fn grade_rejects_unknown_letters(#[case] raw: &str) {
        let err = raw.parse::<Grade>().expect_err("unknown grade");
        assert!(err.to_string().contains("unknown grade"));
    }
}
