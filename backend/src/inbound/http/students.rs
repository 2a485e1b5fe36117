//! Student page handlers.
//!
//! ```text
//! GET  /Students?sortOrder=date_desc
//! GET  /Students/Details/{id}
//! GET  /Students/Create          POST /Students/Create
//! GET  /Students/Edit/{id}       POST /Students/Edit/{id}
//! GET  /Students/Delete/{id}     POST /Students/Delete/{id}
//! ```
//!
//! Every POST checks the antiforgery token before anything else runs.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{error, warn};
use utoipa::IntoParams;

use crate::domain::{Error, ErrorCode, Student, StudentId, StudentSortOrder};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, submitted_token};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::student_forms::{
    AntiforgeryForm, FieldError, SAVE_FAILED_MESSAGE, StudentForm,
};
use crate::inbound::http::student_views::{
    DELETE_FAILED_MESSAGE, StudentDeleteView, StudentDetailsView, StudentFormValues,
    StudentFormView, StudentListView, StudentSummary,
};

const INDEX_PATH: &str = "/Students";

/// Query string accepted by the listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `date_desc`, `last_name_desc` or `first_name_desc`; anything else
    /// sorts by last name descending.
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Query string accepted by the delete page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Set after a failed delete to show the retry banner.
    #[serde(rename = "saveError")]
    pub save_error: Option<String>,
}

impl DeleteQuery {
    fn show_banner(&self) -> bool {
        self.save_error
            .as_deref()
            .is_some_and(|raw| raw.trim().eq_ignore_ascii_case("true"))
    }
}

/// Register every student route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(details)
        .service(create_form)
        .service(create)
        .service(edit_form)
        .service(edit)
        .service(delete_form)
        .service(delete_confirmed);
}

/// Unparseable and non-positive identities are treated as absent.
fn parse_student_id(raw: &str) -> Option<StudentId> {
    raw.trim().parse().ok()
}

fn student_not_found() -> Error {
    Error::not_found("student not found")
}

/// Check the antiforgery token, then hand back the submitted fields.
///
/// A missing or unreadable body still reaches the token check, so it is
/// rejected as forbidden; once the token passes it binds as an empty form.
fn verified_form(
    session: &SessionContext,
    req: &HttpRequest,
    form: Option<web::Form<StudentForm>>,
) -> ApiResult<StudentForm> {
    let form = form.map(web::Form::into_inner);
    let form_token = form.as_ref().and_then(|form| form.antiforgery_token.as_deref());
    session.verify_antiforgery_token(submitted_token(req, form_token))?;
    Ok(form.unwrap_or_default())
}

async fn require_student(state: &HttpState, raw_id: &str) -> ApiResult<Student> {
    let id = parse_student_id(raw_id).ok_or_else(student_not_found)?;
    state
        .students
        .find_student(id)
        .await?
        .ok_or_else(student_not_found)
}

fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn form_view(
    session: &SessionContext,
    student: StudentFormValues,
    errors: Vec<FieldError>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(StudentFormView {
        antiforgery_token: session.antiforgery_token()?,
        student,
        errors,
    }))
}

/// List every student in the requested order.
#[utoipa::path(
    get,
    path = "/Students",
    params(ListQuery),
    responses(
        (status = 200, description = "Students", body = StudentListView),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/Students")]
pub async fn index(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<StudentListView>> {
    let order = StudentSortOrder::from_token(query.sort_order.as_deref());
    let students = state.students.list_students(order).await?;
    Ok(web::Json(StudentListView::new(order, &students)))
}

/// Show one student with enrollments and courses.
#[utoipa::path(
    get,
    path = "/Students/Details/{id}",
    params(("id" = i32, Path, description = "Student identity")),
    responses(
        (status = 200, description = "Student details", body = StudentDetailsView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["students"],
    operation_id = "studentDetails"
)]
#[get("/Students/Details/{id}")]
pub async fn details(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StudentDetailsView>> {
    let id = parse_student_id(&path).ok_or_else(student_not_found)?;
    let student = state
        .students
        .student_details(id)
        .await?
        .ok_or_else(student_not_found)?;
    Ok(web::Json(StudentDetailsView::from(&student)))
}

/// Empty create form.
#[utoipa::path(
    get,
    path = "/Students/Create",
    responses((status = 200, description = "Create form", body = StudentFormView)),
    tags = ["students"],
    operation_id = "createStudentForm"
)]
#[get("/Students/Create")]
pub async fn create_form(session: SessionContext) -> ApiResult<HttpResponse> {
    form_view(&session, StudentFormValues::default(), Vec::new())
}

/// Create a student from the allow-listed form fields.
#[utoipa::path(
    post,
    path = "/Students/Create",
    request_body(content = StudentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created; redirect to the listing"),
        (status = 200, description = "Form redisplayed with errors", body = StudentFormView),
        (status = 403, description = "Antiforgery token missing or invalid", body = Error)
    ),
    tags = ["students"],
    operation_id = "createStudent"
)]
#[post("/Students/Create")]
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    form: Option<web::Form<StudentForm>>,
) -> ApiResult<HttpResponse> {
    let form = verified_form(&session, &req, form)?;

    let draft = match form.bind_draft() {
        Ok(draft) => draft,
        Err(errors) => return form_view(&session, StudentFormValues::from(&form), errors),
    };
    match state.student_commands.create_student(draft).await {
        Ok(_) => Ok(redirect_to(INDEX_PATH)),
        Err(err) => {
            warn!(error = %err, "unable to save new student");
            form_view(
                &session,
                StudentFormValues::from(&form),
                vec![FieldError::form(SAVE_FAILED_MESSAGE)],
            )
        }
    }
}

/// Edit form pre-populated with the stored values.
#[utoipa::path(
    get,
    path = "/Students/Edit/{id}",
    params(("id" = i32, Path, description = "Student identity")),
    responses(
        (status = 200, description = "Edit form", body = StudentFormView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["students"],
    operation_id = "editStudentForm"
)]
#[get("/Students/Edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let student = require_student(&state, &path).await?;
    form_view(&session, StudentFormValues::from(&student), Vec::new())
}

/// Apply the submitted allow-listed fields to an existing student.
#[utoipa::path(
    post,
    path = "/Students/Edit/{id}",
    params(("id" = i32, Path, description = "Student identity")),
    request_body(content = StudentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Saved; redirect to the listing"),
        (status = 200, description = "Form redisplayed with errors", body = StudentFormView),
        (status = 403, description = "Antiforgery token missing or invalid", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["students"],
    operation_id = "editStudent"
)]
#[post("/Students/Edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    form: Option<web::Form<StudentForm>>,
) -> ApiResult<HttpResponse> {
    let form = verified_form(&session, &req, form)?;

    let student = require_student(&state, &path).await?;
    let changes = match form.bind_changes() {
        Ok(changes) => changes,
        Err(errors) => return form_view(&session, StudentFormValues::from(&student), errors),
    };

    let mut attempted = student.clone();
    attempted.apply(changes.clone());
    match state
        .student_commands
        .update_student(student.id(), changes)
        .await
    {
        Ok(_) => Ok(redirect_to(INDEX_PATH)),
        Err(err) if err.code() == ErrorCode::NotFound => Err(err),
        Err(err) => {
            warn!(student_id = %student.id(), error = %err, "unable to save student changes");
            form_view(
                &session,
                StudentFormValues::from(&attempted),
                vec![FieldError::form(SAVE_FAILED_MESSAGE)],
            )
        }
    }
}

/// Delete confirmation page.
#[utoipa::path(
    get,
    path = "/Students/Delete/{id}",
    params(("id" = i32, Path, description = "Student identity"), DeleteQuery),
    responses(
        (status = 200, description = "Delete confirmation", body = StudentDeleteView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["students"],
    operation_id = "deleteStudentForm"
)]
#[get("/Students/Delete/{id}")]
pub async fn delete_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<web::Json<StudentDeleteView>> {
    let student = require_student(&state, &path).await?;
    Ok(web::Json(StudentDeleteView {
        antiforgery_token: session.antiforgery_token()?,
        student: StudentSummary::from(&student),
        error_message: query
            .show_banner()
            .then(|| DELETE_FAILED_MESSAGE.to_owned()),
    }))
}

/// Remove a student. Absent records redirect straight to the listing.
#[utoipa::path(
    post,
    path = "/Students/Delete/{id}",
    params(("id" = i32, Path, description = "Student identity")),
    request_body(content = AntiforgeryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the listing, or back to the delete page on failure"),
        (status = 403, description = "Antiforgery token missing or invalid", body = Error)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[post("/Students/Delete/{id}")]
pub async fn delete_confirmed(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    form: Option<web::Form<AntiforgeryForm>>,
) -> ApiResult<HttpResponse> {
    let form_token = form.as_ref().and_then(|form| form.antiforgery_token.as_deref());
    session.verify_antiforgery_token(submitted_token(&req, form_token))?;

    let Some(id) = parse_student_id(&path) else {
        return Ok(redirect_to(INDEX_PATH));
    };
    match state.student_commands.delete_student(id).await {
        Ok(_) => Ok(redirect_to(INDEX_PATH)),
        Err(err) => {
            error!(student_id = %id, error = %err, "unable to delete student");
            Ok(redirect_to(&format!("/Students/Delete/{id}?saveError=true")))
        }
    }
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
