//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the student page handlers and health checks. The
//! document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Grade};
use crate::inbound::http::student_forms::{AntiforgeryForm, FieldError, StudentForm};
use crate::inbound::http::student_views::{
    EnrollmentView, SortLinks, StudentDeleteView, StudentDetailsView, StudentFormValues,
    StudentFormView, StudentListView, StudentSummary,
};

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "School records API",
        description = "Student listing, detail, create, edit and delete pages rendered as JSON view models."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::index,
        crate::inbound::http::students::details,
        crate::inbound::http::students::create_form,
        crate::inbound::http::students::create,
        crate::inbound::http::students::edit_form,
        crate::inbound::http::students::edit,
        crate::inbound::http::students::delete_form,
        crate::inbound::http::students::delete_confirmed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Grade,
        StudentForm,
        AntiforgeryForm,
        FieldError,
        StudentSummary,
        SortLinks,
        StudentListView,
        EnrollmentView,
        StudentDetailsView,
        StudentFormValues,
        StudentFormView,
        StudentDeleteView,
    )),
    tags(
        (name = "students", description = "Student record pages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/Students")]
    #[case("/Students/Details/{id}")]
    #[case("/Students/Create")]
    #[case("/Students/Edit/{id}")]
    #[case("/Students/Delete/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    fn form_schema_uses_form_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let form_schema = schemas.get("StudentForm").expect("StudentForm schema");

        for field in [
            "LastName",
            "FirstName",
            "EnrollmentDate",
            "__RequestVerificationToken",
        ] {
            assert_object_schema_has_field(form_schema, field);
        }
    }
}
