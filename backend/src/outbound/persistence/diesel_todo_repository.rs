//! PostgreSQL-backed `TodoRepository` implementation using Diesel.
//!
//! This adapter implements the domain's `TodoRepository` port. Identifier
//! assignment and timestamp stamping happen here, so the database never
//! generates values the domain has to read back.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest, SortDirection};
use tracing::debug;

use crate::domain::ports::{
    TodoRepository, TodoRepositoryError, TodoSort, TodoSortField,
};
use crate::domain::{Todo, TodoDraft, TodoId, Username};

use super::models::{NewTodoRow, TodoChangeset, TodoRow};
use super::pool::{DbPool, PoolError};
use super::schema::todos;

/// Diesel-backed implementation of the `TodoRepository` port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain todo repository errors.
fn map_pool_error(error: PoolError) -> TodoRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TodoRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain todo repository errors.
fn map_diesel_error(error: diesel::result::Error) -> TodoRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TodoRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => TodoRepositoryError::query("database error"),
        DieselError::NotFound => TodoRepositoryError::query("record not found"),
        _ => TodoRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain todo.
fn row_to_todo(row: TodoRow) -> Result<Todo, TodoRepositoryError> {
    row.into_domain()
        .map_err(|err| TodoRepositoryError::query(format!("corrupt owner column: {err}")))
}

fn rows_to_page(
    rows: Vec<TodoRow>,
    request: PageRequest,
    total: i64,
) -> Result<Page<Todo>, TodoRepositoryError> {
    let items = rows
        .into_iter()
        .map(row_to_todo)
        .collect::<Result<Vec<_>, _>>()?;
    let total = u64::try_from(total).unwrap_or_default();
    Ok(Page::new(items, request, total))
}

fn page_offset(request: PageRequest) -> i64 {
    i64::try_from(request.offset()).unwrap_or(i64::MAX)
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn create(
        &self,
        owner: &Username,
        draft: TodoDraft,
    ) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let todo = Todo::create(TodoId::random(), owner.clone(), draft, Utc::now());
        let new_row = NewTodoRow {
            id: *todo.id().as_uuid(),
            title: todo.title(),
            description: todo.description(),
            completed: todo.completed(),
            due_date: todo.due_date(),
            owner: owner.as_ref(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        };

        diesel::insert_into(todos::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TodoRow> = todos::table
            .find(id.as_uuid())
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_todo).transpose()
    }

    async fn list_by_owner(
        &self,
        owner: &Username,
        sort: TodoSort,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = todos::table
            .filter(todos::owner.eq(owner.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut query = todos::table
            .filter(todos::owner.eq(owner.as_ref()))
            .select(TodoRow::as_select())
            .into_boxed();
        query = match (sort.field, sort.direction) {
            (TodoSortField::Id, SortDirection::Asc) => query.order(todos::id.asc()),
            (TodoSortField::Id, SortDirection::Desc) => query.order(todos::id.desc()),
            (TodoSortField::Title, SortDirection::Asc) => query.order(todos::title.asc()),
            (TodoSortField::Title, SortDirection::Desc) => query.order(todos::title.desc()),
            (TodoSortField::Completed, SortDirection::Asc) => query.order(todos::completed.asc()),
            (TodoSortField::Completed, SortDirection::Desc) => query.order(todos::completed.desc()),
            (TodoSortField::DueDate, SortDirection::Asc) => query.order(todos::due_date.asc()),
            (TodoSortField::DueDate, SortDirection::Desc) => query.order(todos::due_date.desc()),
            (TodoSortField::CreatedAt, SortDirection::Asc) => query.order(todos::created_at.asc()),
            (TodoSortField::CreatedAt, SortDirection::Desc) => {
                query.order(todos::created_at.desc())
            }
            (TodoSortField::UpdatedAt, SortDirection::Asc) => query.order(todos::updated_at.asc()),
            (TodoSortField::UpdatedAt, SortDirection::Desc) => {
                query.order(todos::updated_at.desc())
            }
        };

        let rows: Vec<TodoRow> = query
            .offset(page_offset(request))
            .limit(i64::from(request.size()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_page(rows, request, total)
    }

    async fn list_by_owner_and_completion(
        &self,
        owner: &Username,
        completed: bool,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let filter = todos::owner
            .eq(owner.as_ref())
            .and(todos::completed.eq(completed));

        let total: i64 = todos::table
            .filter(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<TodoRow> = todos::table
            .filter(filter)
            .select(TodoRow::as_select())
            .order((todos::created_at.asc(), todos::id.asc()))
            .offset(page_offset(request))
            .limit(i64::from(request.size()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_page(rows, request, total)
    }

    async fn list_by_owner_and_due_between(
        &self,
        owner: &Username,
        start: NaiveDate,
        end: NaiveDate,
        request: PageRequest,
    ) -> Result<Page<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // BETWEEN is inclusive on both bounds; rows without a due date never
        // match.
        let filter = todos::owner
            .eq(owner.as_ref())
            .and(todos::due_date.between(Some(start), Some(end)));

        let total: i64 = todos::table
            .filter(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<TodoRow> = todos::table
            .filter(filter)
            .select(TodoRow::as_select())
            .order((todos::created_at.asc(), todos::id.asc()))
            .offset(page_offset(request))
            .limit(i64::from(request.size()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_page(rows, request, total)
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = TodoChangeset {
            title: todo.title(),
            description: todo.description(),
            completed: todo.completed(),
            due_date: todo.due_date(),
            updated_at: todo.updated_at(),
        };

        let row: TodoRow = diesel::update(todos::table.find(todo.id().as_uuid()))
            .set(&changeset)
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_todo(row)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(todos::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, TodoRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, TodoRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn replacement_without_due_date_clears_the_column() {
        let changeset = TodoChangeset {
            title: "Fix the gate",
            description: "",
            completed: false,
            due_date: None,
            updated_at: Utc::now(),
        };
        let statement =
            diesel::update(todos::table.find(uuid::Uuid::new_v4())).set(&changeset);

        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&statement).to_string();
        assert!(sql.contains("\"due_date\""), "due_date missing from SET: {sql}");
    }

    #[rstest]
    fn rows_convert_to_domain_todos() {
        let now = Utc::now();
        let row = TodoRow {
            id: uuid::Uuid::new_v4(),
            title: "Fix the gate".to_owned(),
            description: String::new(),
            completed: false,
            due_date: NaiveDate::from_ymd_opt(2025, 8, 1),
            owner: "user1".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let todo = row_to_todo(row).expect("valid row");
        assert_eq!(todo.title(), "Fix the gate");
        assert_eq!(todo.owner().as_ref(), "user1");
    }

    #[rstest]
    fn blank_owner_columns_are_reported_as_corruption() {
        let now = Utc::now();
        let row = TodoRow {
            id: uuid::Uuid::new_v4(),
            title: "t".to_owned(),
            description: String::new(),
            completed: false,
            due_date: None,
            owner: "   ".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let error = row_to_todo(row).expect_err("corrupt owner");
        assert!(matches!(error, TodoRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(PageRequest::default(), 0)]
    #[case(PageRequest::new(3, 10).expect("valid request"), 30)]
    fn offsets_fit_the_database_types(#[case] request: PageRequest, #[case] expected: i64) {
        assert_eq!(page_offset(request), expected);
    }
}
