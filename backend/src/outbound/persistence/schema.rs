//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate them with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered companies and their locked email domains.
    companies (id) {
        id -> Uuid,
        /// Unique display name.
        #[max_length = 200]
        name -> Varchar,
        /// Unique lower-case work email domain, immutable once set.
        #[max_length = 253]
        domain -> Varchar,
        form_config -> Jsonb,
        form_schema_version -> Int4,
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Student and employee accounts.
    ///
    /// A CHECK constraint ties `company_id` and `work_email` to the employee
    /// role.
    users (id) {
        id -> Uuid,
        #[max_length = 120]
        name -> Varchar,
        #[max_length = 320]
        email -> Varchar,
        password_hash -> Text,
        #[max_length = 16]
        role -> Varchar,
        company_id -> Nullable<Uuid>,
        #[max_length = 320]
        work_email -> Nullable<Varchar>,
        #[max_length = 120]
        position -> Nullable<Varchar>,
        is_verified -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Referral requests from students.
    referral_requests (id) {
        id -> Uuid,
        student_id -> Uuid,
        /// Null while a broadcast request is unclaimed.
        employee_id -> Nullable<Uuid>,
        company_id -> Nullable<Uuid>,
        #[max_length = 16]
        status -> Varchar,
        #[max_length = 512]
        candidate_name -> Varchar,
        #[max_length = 512]
        candidate_contact -> Varchar,
        #[max_length = 512]
        resume_link -> Varchar,
        #[max_length = 512]
        job_link -> Varchar,
        #[max_length = 2000]
        motivation -> Varchar,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only user notifications.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        message -> Text,
        #[max_length = 32]
        kind -> Varchar,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users -> companies (company_id));
diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(referral_requests -> companies (company_id));

diesel::allow_tables_to_appear_in_same_query!(companies, notifications, referral_requests, users);
