//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Todo, TodoParts, Username};

use super::schema::todos;

/// Row struct for reading from the todos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRow {
    /// Rebuild a domain todo from this row.
    ///
    /// Fails when the stored owner column does not satisfy username
    /// validation, which indicates corrupt data rather than bad input.
    pub(crate) fn into_domain(self) -> Result<Todo, crate::domain::UsernameValidationError> {
        let owner = Username::new(&self.owner)?;
        Ok(Todo::from_parts(TodoParts {
            id: crate::domain::TodoId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            completed: self.completed,
            due_date: self.due_date,
            owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Insertable struct for creating new todo records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub owner: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for full-field replacement of existing todo records.
///
/// `id`, `owner`, and `created_at` are absent so a replacement can never
/// reassign or re-home a row. `due_date` is `treat_none_as_null` so a
/// replacement without a due date clears the column instead of being
/// skipped by `AsChangeset`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
pub(crate) struct TodoChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub completed: bool,
    #[diesel(treat_none_as_null = true)]
    pub due_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}
