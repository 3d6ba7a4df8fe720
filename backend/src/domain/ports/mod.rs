//! Domain ports and supporting types for the hexagonal boundary.

mod identity_provider;
mod todo_repository;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, InMemoryIdentityProvider};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{
    InMemoryTodoRepository, ParseTodoSortFieldError, TodoRepository, TodoRepositoryError,
    TodoSort, TodoSortField,
};
