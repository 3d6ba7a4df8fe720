//! Todo data model.
//!
//! A todo is owned by exactly one identity, assigned at creation from the
//! authenticated caller and never transferable through the update path.
//! Timestamps are stamped by callers so behaviour stays deterministic under
//! test.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameValidationError {
    /// Username was blank once trimmed.
    Empty,
}

impl fmt::Display for UsernameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "username must not be empty"),
        }
    }
}

impl std::error::Error for UsernameValidationError {}

/// Identity string of an authenticated caller and todo owner.
///
/// ## Invariants
/// - Trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from borrowed input.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UsernameValidationError> {
        let normalized = username.as_ref().trim();
        if normalized.is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable todo identifier stored as a UUID.
///
/// Identifier assignment is the storage layer's responsibility; domain code
/// only ever receives an id together with a persisted record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Generate a new random [`TodoId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-suppliable todo fields used for creation and full-field replacement.
///
/// Owner, id, and timestamps are deliberately absent: they are assigned
/// server-side and cannot be set through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    /// Short task title.
    pub title: String,
    /// Free-form task description.
    pub description: String,
    /// Completion flag; defaults to `false` for new todos.
    pub completed: bool,
    /// Optional calendar due date (no time component).
    pub due_date: Option<NaiveDate>,
}

/// Reconstruction parts for a persisted todo.
///
/// Used by storage adapters to rebuild a [`Todo`] from a stored row without
/// re-running creation semantics.
#[derive(Debug, Clone)]
pub struct TodoParts {
    /// Storage-assigned identifier.
    pub id: TodoId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Owning identity.
    pub owner: Username,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A persisted task with lifecycle timestamps.
///
/// ## Invariants
/// - Exactly one owner, assigned at creation, immutable thereafter.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: String,
    description: String,
    completed: bool,
    due_date: Option<NaiveDate>,
    owner: Username,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Construct a freshly created todo owned by `owner`.
    ///
    /// Both timestamps start at `now`; the id comes from the storage layer.
    #[must_use]
    pub fn create(id: TodoId, owner: Username, draft: TodoDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            due_date: draft.due_date,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a todo from persisted parts.
    #[must_use]
    pub fn from_parts(parts: TodoParts) -> Self {
        let TodoParts {
            id,
            title,
            description,
            completed,
            due_date,
            owner,
            created_at,
            updated_at,
        } = parts;
        Self {
            id,
            title,
            description,
            completed,
            due_date,
            owner,
            created_at,
            updated_at,
        }
    }

    /// Replace the client-suppliable fields and refresh `updated_at`.
    ///
    /// Id, owner, and `created_at` are never touched here.
    pub fn apply(&mut self, draft: TodoDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        self.completed = draft.completed;
        self.due_date = draft.due_date;
        self.updated_at = now;
    }

    /// Ownership predicate applied at the start of every single-record
    /// operation.
    #[must_use]
    pub fn is_owned_by(&self, caller: &Username) -> bool {
        &self.owner == caller
    }

    /// Storage-assigned identifier.
    #[must_use]
    pub fn id(&self) -> TodoId {
        self.id
    }

    /// Task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Completion flag.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Optional due date.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Owning identity.
    #[must_use]
    pub fn owner(&self) -> &Username {
        &self.owner
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
