//! Diesel table definitions for the school schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Students managed by this service. `id` is assigned by a sequence.
    students (id) {
        id -> Int4,
        last_name -> Varchar,
        first_name -> Varchar,
        enrollment_date -> Date,
    }
}

diesel::table! {
    /// Course catalogue. Identities are assigned by the catalogue, not a sequence.
    courses (id) {
        id -> Int4,
        title -> Varchar,
        credits -> Int4,
    }
}

diesel::table! {
    /// Student to course association with an optional letter grade.
    enrollments (id) {
        id -> Int4,
        course_id -> Int4,
        student_id -> Int4,
        grade -> Nullable<Varchar>,
    }
}

diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(enrollments -> students (student_id));

diesel::allow_tables_to_appear_in_same_query!(courses, enrollments, students);
