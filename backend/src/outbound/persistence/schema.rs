//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. The
//! `diesel print-schema` command can regenerate them from a live database.

diesel::table! {
    /// Todo records.
    ///
    /// One row per task, keyed by a server-assigned UUID and scoped to an
    /// owning username.
    todos (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Short task title.
        title -> Varchar,
        /// Free-form task description.
        description -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Optional calendar due date.
        due_date -> Nullable<Date>,
        /// Owning username.
        owner -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
