use async_trait::async_trait;
use serde_json::Value;

use super::document_patch::DocumentPatcher;
use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{PartialTodo, Todo, TodoId};

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: Todo) -> Result<Todo, TodoError>;
    async fn get(&self, id: TodoId) -> Result<Todo, TodoError>;
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn update(&self, id: TodoId, input: Todo) -> Result<(), TodoError>;
    async fn patch(&self, id: TodoId, input: PartialTodo) -> Result<(), TodoError>;
    async fn apply_document_patch(&self, id: TodoId, patch: Value) -> Result<(), TodoError>;
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository, P: DocumentPatcher> {
    repo: R,
    patcher: P,
}

impl<R: TodoRepository, P: DocumentPatcher> TodoServiceImpl<R, P> {
    pub fn new(repo: R, patcher: P) -> Self { Self { repo, patcher } }

    pub fn repository(&self) -> &R { &self.repo }
}

#[async_trait]
impl<R: TodoRepository, P: DocumentPatcher> TodoService for TodoServiceImpl<R, P> {
    async fn create(&self, input: Todo) -> Result<Todo, TodoError> {
        input.validate()?;
        let id = self.repo.create(input.clone()).await?;
        tracing::info!(%id, "todo created");
        Ok(Todo { id, ..input })
    }

    async fn get(&self, id: TodoId) -> Result<Todo, TodoError> { self.repo.get(id).await }

    async fn list(&self) -> Result<Vec<Todo>, TodoError> { self.repo.list().await }

    async fn update(&self, id: TodoId, input: Todo) -> Result<(), TodoError> {
        input.validate()?;
        self.repo.update(Todo { id, ..input }).await
    }

    async fn patch(&self, id: TodoId, input: PartialTodo) -> Result<(), TodoError> {
        input.validate()?;
        self.repo.patch(id, input).await
    }

    async fn apply_document_patch(&self, id: TodoId, patch: Value) -> Result<(), TodoError> {
        let current = self.repo.get(id).await?;
        let mut doc = serde_json::to_value(&current)
            .map_err(|e| TodoError::InvalidPatch(e.to_string()))?;
        self.patcher.apply(&mut doc, patch)?;
        let patched: Todo = serde_json::from_value(doc)
            .map_err(|e| TodoError::InvalidPatch(format!("patched document is not a todo: {e}")))?;
        patched.validate()?;
        self.repo.update(Todo { id, ..patched }).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        self.repo.delete(id).await?;
        tracing::info!(%id, "todo deleted");
        Ok(())
    }
}
