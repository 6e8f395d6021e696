use async_trait::async_trait;

use super::error::TodoError;
use super::todo::{PartialTodo, Todo, TodoId};

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> Result<(), TodoError>;
    async fn create(&self, todo: Todo) -> Result<TodoId, TodoError>;
    async fn get(&self, id: TodoId) -> Result<Todo, TodoError>;
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn update(&self, todo: Todo) -> Result<(), TodoError>;
    async fn patch(&self, id: TodoId, patch: PartialTodo) -> Result<(), TodoError>;
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;
    async fn close(&self);
}
