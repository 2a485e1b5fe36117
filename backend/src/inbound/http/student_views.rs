//! JSON view models for the student pages.
//!
//! Each type carries what a page template would receive: the record, any
//! validation messages, banner text, and the antiforgery token for forms.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Enrollment, Grade, Student, StudentSortOrder};

use super::student_forms::{FieldError, StudentForm};

/// Banner shown on the delete page after a failed delete.
pub const DELETE_FAILED_MESSAGE: &str =
    "Delete failed. Try again, and if the problem persists see your system administrator.";

/// Student fields shown on list, delete and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    #[schema(value_type = String, format = Date)]
    pub enrollment_date: NaiveDate,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id().get(),
            last_name: student.last_name().as_str().to_owned(),
            first_name: student.first_name().as_str().to_owned(),
            enrollment_date: student.enrollment_date(),
        }
    }
}

/// Sort tokens a template renders as column header links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortLinks {
    pub last_name: String,
    pub first_name: String,
    pub enrollment_date: String,
}

impl Default for SortLinks {
    fn default() -> Self {
        Self {
            last_name: StudentSortOrder::LastNameDesc.token().to_owned(),
            first_name: StudentSortOrder::FirstNameDesc.token().to_owned(),
            enrollment_date: StudentSortOrder::EnrollmentDateDesc.token().to_owned(),
        }
    }
}

/// `GET /Students` view model.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListView {
    /// Effective ordering after unknown tokens fell back to the default.
    pub sort_order: String,
    pub sort_links: SortLinks,
    pub students: Vec<StudentSummary>,
}

impl StudentListView {
    pub fn new(order: StudentSortOrder, students: &[Student]) -> Self {
        Self {
            sort_order: order.token().to_owned(),
            sort_links: SortLinks::default(),
            students: students.iter().map(StudentSummary::from).collect(),
        }
    }
}

/// Enrollment row on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: i32,
    pub course_id: i32,
    pub course_title: String,
    pub credits: i32,
    pub grade: Option<Grade>,
}

impl From<&Enrollment> for EnrollmentView {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            id: enrollment.id,
            course_id: enrollment.course_id,
            course_title: enrollment.course.title.clone(),
            credits: enrollment.course.credits,
            grade: enrollment.grade,
        }
    }
}

/// `GET /Students/Details/{id}` view model.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetailsView {
    pub student: StudentSummary,
    pub enrollments: Vec<EnrollmentView>,
}

impl From<&Student> for StudentDetailsView {
    fn from(student: &Student) -> Self {
        Self {
            student: StudentSummary::from(student),
            enrollments: student
                .enrollments()
                .iter()
                .map(EnrollmentView::from)
                .collect(),
        }
    }
}

/// Values echoed into the create and edit forms.
///
/// Kept as text so a rejected submission is shown exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentFormValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub last_name: String,
    pub first_name: String,
    pub enrollment_date: String,
}

impl From<&Student> for StudentFormValues {
    fn from(student: &Student) -> Self {
        Self {
            id: Some(student.id().get()),
            last_name: student.last_name().as_str().to_owned(),
            first_name: student.first_name().as_str().to_owned(),
            enrollment_date: student.enrollment_date().format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&StudentForm> for StudentFormValues {
    fn from(form: &StudentForm) -> Self {
        Self {
            id: None,
            last_name: form.last_name.clone().unwrap_or_default(),
            first_name: form.first_name.clone().unwrap_or_default(),
            enrollment_date: form.enrollment_date.clone().unwrap_or_default(),
        }
    }
}

/// Create and edit form view model.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentFormView {
    pub antiforgery_token: String,
    pub student: StudentFormValues,
    pub errors: Vec<FieldError>,
}

/// `GET /Students/Delete/{id}` view model.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDeleteView {
    pub antiforgery_token: String,
    pub student: StudentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, PersonName, StudentDraft, StudentId};
    use rstest::rstest;
    use serde_json::json;

    fn student() -> Student {
        Student::new(
            StudentId::new(7).expect("id"),
            StudentDraft {
                last_name: PersonName::new("Alexander").expect("name"),
                first_name: PersonName::new("Carson").expect("name"),
                enrollment_date: NaiveDate::from_ymd_opt(2019, 9, 1).expect("date"),
            },
        )
    }

    #[rstest]
    fn details_view_serialises_enrollments() {
        let id = StudentId::new(7).expect("id");
        let enrollment = Enrollment {
            id: 3,
            course_id: 1050,
            student_id: id,
            grade: Some(Grade::A),
            course: Course {
                id: 1050,
                title: "Chemistry".into(),
                credits: 3,
            },
        };
        let view = StudentDetailsView::from(&student().with_enrollments(vec![enrollment]));

        let value = serde_json::to_value(&view).expect("serialise");

        assert_eq!(
            value,
            json!({
                "student": {
                    "id": 7,
                    "lastName": "Alexander",
                    "firstName": "Carson",
                    "enrollmentDate": "2019-09-01",
                },
                "enrollments": [{
                    "id": 3,
                    "courseId": 1050,
                    "courseTitle": "Chemistry",
                    "credits": 3,
                    "grade": "A",
                }],
            })
        );
    }

    #[rstest]
    fn list_view_reports_effective_order() {
        let view = StudentListView::new(StudentSortOrder::default(), &[student()]);

        let value = serde_json::to_value(&view).expect("serialise");

        assert_eq!(value["sortOrder"], "last_name_desc");
        assert_eq!(value["sortLinks"]["enrollmentDate"], "date_desc");
        assert_eq!(value["students"][0]["id"], 7);
    }

    #[rstest]
    fn delete_view_omits_banner_when_absent() {
        let view = StudentDeleteView {
            antiforgery_token: "token".into(),
            student: StudentSummary::from(&student()),
            error_message: None,
        };

        let value = serde_json::to_value(&view).expect("serialise");

        assert!(value.get("errorMessage").is_none());
        assert_eq!(value["antiforgeryToken"], "token");
    }
}
