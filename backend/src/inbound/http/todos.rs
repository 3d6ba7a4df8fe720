//! Todo HTTP handlers.
//!
//! ```text
//! POST   /todos
//! GET    /todos
//! GET    /todos/due
//! GET    /todos/completed/{status}
//! GET    /todos/{id}
//! PUT    /todos/{id}
//! DELETE /todos/{id}
//! ```
//!
//! Every endpoint authenticates the caller first and then scopes storage
//! access to that caller. A todo owned by somebody else is reported exactly
//! like a todo that does not exist, so identifiers leak nothing about other
//! users' data.

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use chrono::NaiveDate;
use pagination::Page;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::TodoRepository;
use crate::domain::{Error, Todo, TodoDraft, TodoId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BasicAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date_or, parse_page_request, parse_sort};

/// Request payload for creating or replacing a todo.
///
/// Unknown fields are ignored, so clients that round-trip a fetched todo
/// (including `owner` and timestamps) are accepted; the server-assigned
/// fields simply cannot be changed through this shape.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoBody {
    /// Short task title.
    pub title: String,
    /// Free-form description; empty when omitted.
    #[serde(default)]
    pub description: String,
    /// Completion flag; `false` when omitted.
    #[serde(default)]
    pub completed: bool,
    /// Due date in `YYYY-MM-DD` form.
    #[schema(format = "date")]
    pub due_date: Option<String>,
}

/// Response payload describing a stored todo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponseBody {
    /// Storage-assigned identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Due date in `YYYY-MM-DD` form, if any.
    #[schema(format = "date")]
    pub due_date: Option<String>,
    /// Owning username.
    pub owner: String,
    /// Creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last-modification timestamp.
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Todo> for TodoResponseBody {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id().to_string(),
            title: todo.title().to_owned(),
            description: todo.description().to_owned(),
            completed: todo.completed(),
            due_date: todo.due_date().map(|date| date.to_string()),
            owner: todo.owner().to_string(),
            created_at: todo.created_at().to_rfc3339(),
            updated_at: todo.updated_at().to_rfc3339(),
        }
    }
}

/// Pagination and sorting query parameters for the owner listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    size: Option<String>,
    sort: Option<String>,
}

/// Pagination query parameters for the filtered listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    size: Option<String>,
}

/// Date-range query parameters for the due listing.
#[derive(Debug, Default, Deserialize)]
pub struct DueQuery {
    start: Option<String>,
    end: Option<String>,
    page: Option<String>,
    size: Option<String>,
}

async fn authenticate(state: &HttpState, auth: &BasicAuth) -> ApiResult<Username> {
    state.identity.authenticate(auth.credentials()).await
}

fn parse_body(body: TodoBody) -> ApiResult<TodoDraft> {
    if body.title.trim().is_empty() {
        return Err(
            Error::invalid_request("title must not be empty").with_details(json!({
                "field": "title",
                "code": "empty_title",
            })),
        );
    }
    let due_date = match body.due_date {
        None => None,
        Some(raw) => Some(
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                Error::invalid_request("dueDate must be a YYYY-MM-DD date").with_details(json!({
                    "field": "dueDate",
                    "value": raw,
                    "code": "not_an_iso_date",
                }))
            })?,
        ),
    };
    Ok(TodoDraft {
        title: body.title,
        description: body.description,
        completed: body.completed,
        due_date,
    })
}

fn parse_id(raw: &str) -> ApiResult<TodoId> {
    raw.parse::<uuid::Uuid>().map(TodoId::from_uuid).map_err(|_| {
        Error::invalid_request("id must be a UUID").with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

/// Fetch a todo and confirm the caller owns it.
///
/// Missing and foreign todos produce the same `404`.
async fn find_owned(
    todos: &dyn TodoRepository,
    id: TodoId,
    owner: &Username,
) -> ApiResult<Todo> {
    let todo = todos.find_by_id(id).await?;
    match todo {
        Some(todo) if todo.is_owned_by(owner) => Ok(todo),
        _ => Err(Error::not_found("todo not found")),
    }
}

/// Create a todo owned by the authenticated caller.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = TodoBody,
    responses(
        (status = 201, description = "Todo created; Location names the new resource"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "createTodo",
    security(("BasicAuth" = []))
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    payload: web::Json<TodoBody>,
) -> ApiResult<HttpResponse> {
    let owner = authenticate(&state, &auth).await?;
    let draft = parse_body(payload.into_inner())?;

    let todo = state.todos.create(&owner, draft).await?;
    info!(id = %todo.id(), owner = %owner, "todo created");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/todos/{}", todo.id())))
        .finish())
}

/// List the caller's todos with pagination and sorting.
#[utoipa::path(
    get,
    path = "/todos",
    params(
        ("page" = Option<u32>, Query, description = "Zero-indexed page number"),
        ("size" = Option<u32>, Query, description = "Items per page"),
        ("sort" = Option<String>, Query, description = "Sort as `field` or `field,direction`")
    ),
    responses(
        (status = 200, description = "One page of the caller's todos"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodos",
    security(("BasicAuth" = []))
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<TodoResponseBody>>> {
    let owner = authenticate(&state, &auth).await?;
    let request = parse_page_request(query.page.as_deref(), query.size.as_deref())?;
    let sort = parse_sort(query.sort.as_deref())?;

    let page = state.todos.list_by_owner(&owner, sort, request).await?;
    Ok(web::Json(page.map(TodoResponseBody::from)))
}

/// List the caller's todos due inside an inclusive date range.
///
/// Omitted bounds default to the widest representable dates, so `start`
/// alone means "due on or after" and `end` alone means "due on or before".
#[utoipa::path(
    get,
    path = "/todos/due",
    params(
        ("start" = Option<String>, Query, description = "Inclusive lower bound (YYYY-MM-DD)"),
        ("end" = Option<String>, Query, description = "Inclusive upper bound (YYYY-MM-DD)"),
        ("page" = Option<u32>, Query, description = "Zero-indexed page number"),
        ("size" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "One page of todos due in the range"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodosDue",
    security(("BasicAuth" = []))
)]
#[get("/todos/due")]
pub async fn list_todos_due(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    query: web::Query<DueQuery>,
) -> ApiResult<web::Json<Page<TodoResponseBody>>> {
    let owner = authenticate(&state, &auth).await?;
    let request = parse_page_request(query.page.as_deref(), query.size.as_deref())?;
    let start = parse_date_or("start", query.start.as_deref(), NaiveDate::MIN)?;
    let end = parse_date_or("end", query.end.as_deref(), NaiveDate::MAX)?;

    let page = state
        .todos
        .list_by_owner_and_due_between(&owner, start, end, request)
        .await?;
    Ok(web::Json(page.map(TodoResponseBody::from)))
}

/// List the caller's todos filtered by completion status.
#[utoipa::path(
    get,
    path = "/todos/completed/{status}",
    params(
        ("status" = bool, Path, description = "Completion flag to filter by"),
        ("page" = Option<u32>, Query, description = "Zero-indexed page number"),
        ("size" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "One page of todos with the given status"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "listTodosByCompletion",
    security(("BasicAuth" = []))
)]
#[get("/todos/completed/{status}")]
pub async fn list_todos_by_completion(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<TodoResponseBody>>> {
    let owner = authenticate(&state, &auth).await?;
    let raw = path.into_inner();
    let completed = raw.parse::<bool>().map_err(|_| {
        Error::invalid_request("status must be true or false").with_details(json!({
            "field": "status",
            "value": raw,
            "code": "not_a_boolean",
        }))
    })?;
    let request = parse_page_request(query.page.as_deref(), query.size.as_deref())?;

    let page = state
        .todos
        .list_by_owner_and_completion(&owner, completed, request)
        .await?;
    Ok(web::Json(page.map(TodoResponseBody::from)))
}

/// Fetch one of the caller's todos by identifier.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    params(("id" = uuid::Uuid, Path, description = "Todo identifier")),
    responses(
        (status = 200, description = "The todo", body = TodoResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "getTodo",
    security(("BasicAuth" = []))
)]
#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    path: web::Path<String>,
) -> ApiResult<web::Json<TodoResponseBody>> {
    let owner = authenticate(&state, &auth).await?;
    let id = parse_id(&path.into_inner())?;

    let todo = find_owned(state.todos.as_ref(), id, &owner).await?;
    Ok(web::Json(TodoResponseBody::from(todo)))
}

/// Replace one of the caller's todos.
///
/// Owner, identifier, and the creation timestamp are preserved; only the
/// client-suppliable fields change and `updatedAt` is refreshed.
#[utoipa::path(
    put,
    path = "/todos/{id}",
    params(("id" = uuid::Uuid, Path, description = "Todo identifier")),
    request_body = TodoBody,
    responses(
        (status = 200, description = "The updated todo", body = TodoResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "updateTodo",
    security(("BasicAuth" = []))
)]
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    path: web::Path<String>,
    payload: web::Json<TodoBody>,
) -> ApiResult<web::Json<TodoResponseBody>> {
    let owner = authenticate(&state, &auth).await?;
    let id = parse_id(&path.into_inner())?;
    let draft = parse_body(payload.into_inner())?;

    let mut todo = find_owned(state.todos.as_ref(), id, &owner).await?;
    todo.apply(draft, chrono::Utc::now());
    let todo = state.todos.update(todo).await?;
    info!(id = %todo.id(), owner = %owner, "todo updated");

    Ok(web::Json(TodoResponseBody::from(todo)))
}

/// Delete one of the caller's todos.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    params(("id" = uuid::Uuid, Path, description = "Todo identifier")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo",
    security(("BasicAuth" = []))
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    auth: BasicAuth,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = authenticate(&state, &auth).await?;
    let id = parse_id(&path.into_inner())?;

    // Ownership is checked before any delete is issued.
    find_owned(state.todos.as_ref(), id, &owner).await?;
    let removed = state.todos.delete_by_id(id).await?;
    if !removed {
        return Err(Error::not_found("todo not found"));
    }
    info!(id = %id, owner = %owner, "todo deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "todos_tests.rs"]
mod tests;
