//! Student record and the allow-listed inputs that create or modify it.
//!
//! A [`Student`] is only ever built from a store-assigned [`StudentId`] plus a
//! [`StudentDraft`]. Client input never reaches the identity or the
//! enrollment collection: creation goes through [`StudentDraft`] and edits go
//! through [`StudentChanges`], both of which carry only the three editable
//! fields.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::Enrollment;

/// Maximum number of characters accepted for a first or last name.
pub const NAME_MAX: usize = 50;

/// Validation errors raised by the student constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    NonPositiveId,
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "student id must be a positive integer"),
            Self::InvalidId => write!(f, "student id must be an integer"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for StudentValidationError {}

/// Store-assigned student identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(i32);

impl StudentId {
    /// Validate and wrap a raw identity.
    ///
    /// # Examples
    /// ```
    /// use school::domain::StudentId;
    ///
    /// assert_eq!(StudentId::new(5).map(|id| id.get()), Ok(5));
    /// assert!(StudentId::new(0).is_err());
    /// ```
    pub fn new(raw: i32) -> Result<Self, StudentValidationError> {
        if raw <= 0 {
            return Err(StudentValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value as stored.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for StudentId {
    type Err = StudentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .parse::<i32>()
            .map_err(|_| StudentValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First or last name of a student.
///
/// ## Invariants
/// - non-empty once trimmed; stored trimmed.
/// - at most [`NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name.
    pub fn new(name: impl Into<String>) -> Result<Self, StudentValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(StudentValidationError::NameTooLong { max: NAME_MAX });
        }
        if trimmed.len() == name.len() {
            Ok(Self(name))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the name as text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields accepted when creating a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub last_name: PersonName,
    pub first_name: PersonName,
    pub enrollment_date: NaiveDate,
}

/// Partial update restricted to the editable fields.
///
/// `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentChanges {
    pub last_name: Option<PersonName>,
    pub first_name: Option<PersonName>,
    pub enrollment_date: Option<NaiveDate>,
}

impl StudentChanges {
    /// True when no editable field was supplied.
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none() && self.first_name.is_none() && self.enrollment_date.is_none()
    }
}

/// Student record.
///
/// `enrollments` is empty unless the record was read through the detail
/// query, which loads each enrollment together with its course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    last_name: PersonName,
    first_name: PersonName,
    enrollment_date: NaiveDate,
    enrollments: Vec<Enrollment>,
}

impl Student {
    /// Build a record from its store-assigned identity and field values.
    pub fn new(id: StudentId, draft: StudentDraft) -> Self {
        let StudentDraft {
            last_name,
            first_name,
            enrollment_date,
        } = draft;
        Self {
            id,
            last_name,
            first_name,
            enrollment_date,
            enrollments: Vec::new(),
        }
    }

    /// Attach eagerly loaded enrollments.
    #[must_use]
    pub fn with_enrollments(mut self, enrollments: Vec<Enrollment>) -> Self {
        self.enrollments = enrollments;
        self
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Apply the supplied editable fields, leaving the rest untouched.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use school::domain::{PersonName, Student, StudentChanges, StudentDraft, StudentId};
    ///
    /// let date = NaiveDate::from_ymd_opt(2023, 9, 1).expect("valid date");
    /// let mut student = Student::new(
    ///     StudentId::new(5).expect("valid id"),
    ///     StudentDraft {
    ///         last_name: PersonName::new("Lee").expect("valid name"),
    ///         first_name: PersonName::new("Ana").expect("valid name"),
    ///         enrollment_date: date,
    ///     },
    /// );
    /// student.apply(StudentChanges {
    ///     first_name: Some(PersonName::new("Updated").expect("valid name")),
    ///     ..StudentChanges::default()
    /// });
    /// assert_eq!(student.first_name().as_str(), "Updated");
    /// assert_eq!(student.last_name().as_str(), "Lee");
    /// ```
    pub fn apply(&mut self, changes: StudentChanges) {
        let StudentChanges {
            last_name,
            first_name,
            enrollment_date,
        } = changes;
        if let Some(value) = last_name {
            self.last_name = value;
        }
        if let Some(value) = first_name {
            self.first_name = value;
        }
        if let Some(value) = enrollment_date {
            self.enrollment_date = value;
        }
    }
}
