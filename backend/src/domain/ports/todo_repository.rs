//! Port abstraction for todo persistence adapters and their errors.
//!
//! The repository is the only component that assigns identifiers or touches
//! stored rows. Every operation is scoped by the owner supplied by the
//! handler; the repository itself makes no ownership decisions beyond
//! matching that filter.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pagination::{Page, PageRequest, SortDirection};

use crate::domain::{Error, Todo, TodoDraft, TodoId, Username};

/// Persistence errors raised by todo repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoRepositoryError {
    /// Repository connection could not be established.
    #[error("todo repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("todo repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl TodoRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<TodoRepositoryError> for Error {
    fn from(err: TodoRepositoryError) -> Self {
        match err {
            TodoRepositoryError::Connection { message } => {
                tracing::error!(%message, "todo storage unreachable");
                Self::service_unavailable("todo storage unavailable")
            }
            TodoRepositoryError::Query { message } => {
                tracing::error!(%message, "todo storage query failed");
                Self::internal("todo storage query failed")
            }
        }
    }
}

/// Sortable todo fields, a fixed allow-list mirroring the record's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoSortField {
    /// Sort by identifier.
    Id,
    /// Sort by title.
    Title,
    /// Sort by completion flag.
    Completed,
    /// Sort by due date.
    DueDate,
    /// Sort by creation timestamp.
    CreatedAt,
    /// Sort by last-modification timestamp.
    UpdatedAt,
}

impl TodoSortField {
    /// Wire tokens accepted by [`TodoSortField::from_str`].
    pub const TOKENS: [&'static str; 6] = [
        "id",
        "title",
        "completed",
        "dueDate",
        "createdAt",
        "updatedAt",
    ];
}

/// Error returned when a sort token is not in the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort field: {token}")]
pub struct ParseTodoSortFieldError {
    /// The rejected token.
    pub token: String,
}

impl FromStr for TodoSortField {
    type Err = ParseTodoSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "completed" => Ok(Self::Completed),
            "dueDate" => Ok(Self::DueDate),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            other => Err(ParseTodoSortFieldError {
                token: other.to_owned(),
            }),
        }
    }
}

/// Single-field sort descriptor for owner listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoSort {
    /// Field to order by.
    pub field: TodoSortField,
    /// Ascending or descending.
    pub direction: SortDirection,
}

impl Default for TodoSort {
    fn default() -> Self {
        Self {
            field: TodoSortField::DueDate,
            direction: SortDirection::Asc,
        }
    }
}

/// Persistence port for todo records.
///
/// Absence is a value here: lookups return `Ok(None)` and deletes report
/// whether a row existed, so adapters never use errors for normal control
/// flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Persist a new todo for `owner`, assigning a fresh identifier and
    /// stamping both lifecycle timestamps.
    async fn create(
        &self,
        owner: &Username,
        draft: TodoDraft,
    ) -> Result<Todo, TodoRepositoryError>;

    /// Fetch a todo by identifier regardless of owner.
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Page through an owner's todos ordered by `sort`.
    async fn list_by_owner(
        &self,
        owner: &Username,
        sort: TodoSort,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError>;

    /// Page through an owner's todos filtered by completion status.
    async fn list_by_owner_and_completion(
        &self,
        owner: &Username,
        completed: bool,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError>;

    /// Page through an owner's todos due inside the inclusive date range.
    async fn list_by_owner_and_due_between(
        &self,
        owner: &Username,
        start: NaiveDate,
        end: NaiveDate,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError>;

    /// Persist a full-field replacement of an existing todo.
    async fn update(&self, todo: Todo) -> Result<Todo, TodoRepositoryError>;

    /// Remove a todo, reporting whether a row existed.
    async fn delete_by_id(&self, id: TodoId) -> Result<bool, TodoRepositoryError>;
}

/// Mutex-backed in-memory repository.
///
/// Serves handler tests and deployments without a configured database. Its
/// filter, ordering, and pagination semantics match the Diesel adapter so the
/// two are interchangeable behind the port.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<HashMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot_for_owner(&self, owner: &Username) -> Result<Vec<Todo>, TodoRepositoryError> {
        let todos = self
            .todos
            .lock()
            .map_err(|_| TodoRepositoryError::query("todo store poisoned"))?;
        Ok(todos
            .values()
            .filter(|todo| todo.is_owned_by(owner))
            .cloned()
            .collect())
    }
}

fn compare(a: &Todo, b: &Todo, sort: TodoSort) -> std::cmp::Ordering {
    let ordering = match sort.field {
        TodoSortField::Id => a.id().cmp(&b.id()),
        TodoSortField::Title => a.title().cmp(b.title()),
        TodoSortField::Completed => a.completed().cmp(&b.completed()),
        TodoSortField::DueDate => a.due_date().cmp(&b.due_date()),
        TodoSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        TodoSortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable fallback order for the filtered listings, which take no sort
/// parameter: creation time, then id to break ties.
fn stable_order(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

fn paginate(todos: Vec<Todo>, request: PageRequest) -> Page<Todo> {
    let total = todos.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let items: Vec<Todo> = todos
        .into_iter()
        .skip(offset)
        .take(request.size() as usize)
        .collect();
    Page::new(items, request, total)
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(
        &self,
        owner: &Username,
        draft: TodoDraft,
    ) -> Result<Todo, TodoRepositoryError> {
        let todo = Todo::create(TodoId::random(), owner.clone(), draft, Utc::now());
        let mut todos = self
            .todos
            .lock()
            .map_err(|_| TodoRepositoryError::query("todo store poisoned"))?;
        todos.insert(todo.id(), todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoRepositoryError> {
        let todos = self
            .todos
            .lock()
            .map_err(|_| TodoRepositoryError::query("todo store poisoned"))?;
        Ok(todos.get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &Username,
        sort: TodoSort,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError> {
        let mut todos = self.snapshot_for_owner(owner)?;
        todos.sort_by(|a, b| compare(a, b, sort));
        Ok(paginate(todos, request))
    }

    async fn list_by_owner_and_completion(
        &self,
        owner: &Username,
        completed: bool,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError> {
        let mut todos = self.snapshot_for_owner(owner)?;
        todos.retain(|todo| todo.completed() == completed);
        stable_order(&mut todos);
        Ok(paginate(todos, request))
    }

    async fn list_by_owner_and_due_between(
        &self,
        owner: &Username,
        start: NaiveDate,
        end: NaiveDate,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError> {
        let mut todos = self.snapshot_for_owner(owner)?;
        todos.retain(|todo| {
            todo.due_date()
                .is_some_and(|due| due >= start && due <= end)
        });
        stable_order(&mut todos);
        Ok(paginate(todos, request))
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoRepositoryError> {
        let mut todos = self
            .todos
            .lock()
            .map_err(|_| TodoRepositoryError::query("todo store poisoned"))?;
        // Last write wins; there is no version column to check.
        todos.insert(todo.id(), todo.clone());
        Ok(todo)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool, TodoRepositoryError> {
        let mut todos = self
            .todos
            .lock()
            .map_err(|_| TodoRepositoryError::query("todo store poisoned"))?;
        Ok(todos.remove(&id).is_some())
    }
}
