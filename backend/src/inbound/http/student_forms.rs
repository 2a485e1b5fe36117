//! Form binding for student create and edit requests.
//!
//! Only `LastName`, `FirstName` and `EnrollmentDate` are bound. Any other
//! field in the body (`ID`, `Enrollments`, ...) is dropped during
//! deserialisation, so over-posted values never reach the domain.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PersonName, StudentChanges, StudentDraft, StudentValidationError};

/// Generic message attached to a form when the store rejects a write.
pub const SAVE_FAILED_MESSAGE: &str =
    "Unable to save changes. Try again, and if the problem persists see your system administrator.";

pub(crate) const LAST_NAME_FIELD: &str = "LastName";
pub(crate) const FIRST_NAME_FIELD: &str = "FirstName";
pub(crate) const ENROLLMENT_DATE_FIELD: &str = "EnrollmentDate";

/// Raw `application/x-www-form-urlencoded` body for student forms.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StudentForm {
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "EnrollmentDate")]
    pub enrollment_date: Option<String>,
    #[serde(rename = "__RequestVerificationToken")]
    pub antiforgery_token: Option<String>,
}

/// Body accepted by the delete confirmation; only the token matters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AntiforgeryForm {
    #[serde(rename = "__RequestVerificationToken")]
    pub antiforgery_token: Option<String>,
}

/// One validation message, keyed by form field. Form-level messages have no
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    fn for_field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_owned()),
            message: message.into(),
        }
    }

    /// Message that applies to the whole form.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

fn required(field: &str) -> FieldError {
    FieldError::for_field(field, format!("The {field} field is required."))
}

fn bind_name(field: &str, raw: Option<&str>) -> Result<Option<PersonName>, FieldError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match PersonName::new(raw) {
        Ok(name) => Ok(Some(name)),
        Err(StudentValidationError::EmptyName) => Err(required(field)),
        Err(StudentValidationError::NameTooLong { max }) => Err(FieldError::for_field(
            field,
            format!("The field {field} must be a string with a maximum length of {max}."),
        )),
        Err(other) => Err(FieldError::for_field(field, other.to_string())),
    }
}

fn bind_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, FieldError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(required(field));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FieldError::for_field(field, format!("The value '{raw}' is not valid for {field}.")))
}

/// Fields that survived binding, before the required check.
struct BoundFields {
    last_name: Option<PersonName>,
    first_name: Option<PersonName>,
    enrollment_date: Option<NaiveDate>,
}

fn collect<T>(result: Result<Option<T>, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.unwrap_or_else(|error| {
        errors.push(error);
        None
    })
}

impl StudentForm {
    fn bind_fields(&self) -> (BoundFields, Vec<FieldError>) {
        let mut errors = Vec::new();
        let fields = BoundFields {
            last_name: collect(
                bind_name(LAST_NAME_FIELD, self.last_name.as_deref()),
                &mut errors,
            ),
            first_name: collect(
                bind_name(FIRST_NAME_FIELD, self.first_name.as_deref()),
                &mut errors,
            ),
            enrollment_date: collect(
                bind_date(ENROLLMENT_DATE_FIELD, self.enrollment_date.as_deref()),
                &mut errors,
            ),
        };
        (fields, errors)
    }

    /// Bind a complete new record; every allow-listed field is required.
    ///
    /// All failures are reported together, in form order.
    pub fn bind_draft(&self) -> Result<StudentDraft, Vec<FieldError>> {
        let (fields, mut errors) = self.bind_fields();
        if self.last_name.is_none() {
            errors.push(required(LAST_NAME_FIELD));
        }
        if self.first_name.is_none() {
            errors.push(required(FIRST_NAME_FIELD));
        }
        if self.enrollment_date.is_none() {
            errors.push(required(ENROLLMENT_DATE_FIELD));
        }
        match fields {
            BoundFields {
                last_name: Some(last_name),
                first_name: Some(first_name),
                enrollment_date: Some(enrollment_date),
            } if errors.is_empty() => Ok(StudentDraft {
                last_name,
                first_name,
                enrollment_date,
            }),
            _ => {
                sort_by_field_order(&mut errors);
                Err(errors)
            }
        }
    }

    /// Bind only the allow-listed fields that were submitted. Absent fields
    /// stay `None` and keep their stored value when applied.
    pub fn bind_changes(&self) -> Result<StudentChanges, Vec<FieldError>> {
        let (fields, errors) = self.bind_fields();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(StudentChanges {
            last_name: fields.last_name,
            first_name: fields.first_name,
            enrollment_date: fields.enrollment_date,
        })
    }
}

fn field_rank(error: &FieldError) -> usize {
    match error.field.as_deref() {
        Some(LAST_NAME_FIELD) => 0,
        Some(FIRST_NAME_FIELD) => 1,
        Some(ENROLLMENT_DATE_FIELD) => 2,
        _ => 3,
    }
}

fn sort_by_field_order(errors: &mut [FieldError]) {
    errors.sort_by_key(field_rank);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NAME_MAX;
    use rstest::rstest;

    fn form(last: Option<&str>, first: Option<&str>, date: Option<&str>) -> StudentForm {
        StudentForm {
            last_name: last.map(str::to_owned),
            first_name: first.map(str::to_owned),
            enrollment_date: date.map(str::to_owned),
            antiforgery_token: None,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors
            .iter()
            .filter_map(|error| error.field.as_deref())
            .collect()
    }

    #[rstest]
    fn binds_complete_draft() {
        let draft = form(Some(" Lee "), Some("Ann"), Some("2023-09-01"))
            .bind_draft()
            .expect("valid draft");

        assert_eq!(draft.last_name.as_str(), "Lee");
        assert_eq!(draft.first_name.as_str(), "Ann");
        assert_eq!(
            draft.enrollment_date,
            NaiveDate::from_ymd_opt(2023, 9, 1).expect("date")
        );
    }

    #[rstest]
    fn reports_every_missing_field() {
        let errors = form(None, Some("  "), None)
            .bind_draft()
            .expect_err("invalid draft");

        assert_eq!(
            fields(&errors),
            vec![LAST_NAME_FIELD, FIRST_NAME_FIELD, ENROLLMENT_DATE_FIELD]
        );
        assert!(
            errors
                .iter()
                .all(|error| error.message.ends_with("field is required."))
        );
    }

    #[rstest]
    #[case("2023-13-01")]
    #[case("01/09/2023")]
    #[case("yesterday")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        let errors = form(Some("Lee"), Some("Ann"), Some(raw))
            .bind_draft()
            .expect_err("invalid date");

        assert_eq!(
            errors,
            vec![FieldError::for_field(
                ENROLLMENT_DATE_FIELD,
                format!("The value '{raw}' is not valid for EnrollmentDate.")
            )]
        );
    }

    #[rstest]
    fn rejects_overlong_names() {
        let long = "x".repeat(NAME_MAX + 1);
        let errors = form(Some(&long), Some("Ann"), Some("2023-09-01"))
            .bind_draft()
            .expect_err("too long");

        assert_eq!(fields(&errors), vec![LAST_NAME_FIELD]);
        assert!(errors[0].message.contains("maximum length of 50"));
    }

    #[rstest]
    fn changes_include_only_submitted_fields() {
        let changes = form(None, Some("Bea"), None)
            .bind_changes()
            .expect("valid changes");

        assert!(changes.last_name.is_none());
        assert_eq!(changes.first_name.as_ref().map(PersonName::as_str), Some("Bea"));
        assert!(changes.enrollment_date.is_none());
    }

    #[rstest]
    fn changes_reject_blank_submitted_fields() {
        let errors = form(Some(""), None, Some("bad"))
            .bind_changes()
            .expect_err("invalid changes");

        assert_eq!(fields(&errors), vec![LAST_NAME_FIELD, ENROLLMENT_DATE_FIELD]);
    }
}
