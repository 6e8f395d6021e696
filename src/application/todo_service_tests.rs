#[cfg(test)]
mod tests {
    use super::super::document_patch::JsonPatcher;
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{error::TodoError, repository::TodoRepository, todo::{PartialTodo, Todo, TodoId}};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryRepo {
        items: Arc<Mutex<BTreeMap<i64, Todo>>>,
        next_id: Arc<Mutex<i64>>,
    }

    #[async_trait]
    impl TodoRepository for InMemoryRepo {
        async fn init(&self) -> Result<(), TodoError> { Ok(()) }
        async fn create(&self, todo: Todo) -> Result<TodoId, TodoError> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let id = TodoId(*next);
            self.items.lock().unwrap().insert(id.0, Todo { id, ..todo });
            Ok(id)
        }
        async fn get(&self, id: TodoId) -> Result<Todo, TodoError> {
            self.items.lock().unwrap().get(&id.0).cloned().ok_or(TodoError::NotFound)
        }
        async fn list(&self) -> Result<Vec<Todo>, TodoError> { Ok(self.items.lock().unwrap().values().cloned().collect()) }
        async fn update(&self, todo: Todo) -> Result<(), TodoError> {
            let mut map = self.items.lock().unwrap();
            let slot = map.get_mut(&todo.id.0).ok_or(TodoError::NotFound)?;
            *slot = todo;
            Ok(())
        }
        async fn patch(&self, id: TodoId, patch: PartialTodo) -> Result<(), TodoError> {
            let mut map = self.items.lock().unwrap();
            let slot = map.get_mut(&id.0).ok_or(TodoError::NotFound)?;
            patch.merge_into(slot);
            Ok(())
        }
        async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
            self.items.lock().unwrap().remove(&id.0).map(|_| ()).ok_or(TodoError::NotFound)
        }
        async fn close(&self) {}
    }

    fn service() -> TodoServiceImpl<InMemoryRepo, JsonPatcher> {
        TodoServiceImpl::new(InMemoryRepo::default(), JsonPatcher)
    }

    fn todo(description: &str) -> Todo {
        Todo { id: TodoId(0), description: description.into(), is_completed: false }
    }

    #[tokio::test]
    async fn unit_create_and_get() {
        let service = service();
        let created = service.create(todo("X")).await.unwrap();
        assert_eq!(created.id, TodoId(1));
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn create_rejects_overlong_description() {
        let service = service();
        let err = service.create(todo(&"a".repeat(300))).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_uses_path_id() {
        let service = service();
        let created = service.create(todo("before")).await.unwrap();
        let body = Todo { id: TodoId(999), description: "after".into(), is_completed: true };
        service.update(created.id, body).await.unwrap();
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got, Todo { id: created.id, description: "after".into(), is_completed: true });
        assert!(matches!(service.get(TodoId(999)).await, Err(TodoError::NotFound)));
    }

    #[tokio::test]
    async fn merge_patch_keeps_absent_fields() {
        let service = service();
        let created = service.create(Todo { is_completed: true, ..todo("keep") }).await.unwrap();
        service.patch(created.id, PartialTodo { description: Some("new".into()), is_completed: None }).await.unwrap();
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got.description, "new");
        assert!(got.is_completed);
    }

    #[tokio::test]
    async fn document_patch_replaces_fields_and_ignores_id() {
        let service = service();
        let created = service.create(todo("draft")).await.unwrap();
        service
            .apply_document_patch(created.id, json!([
                { "op": "replace", "path": "/description", "value": "final" },
                { "op": "replace", "path": "/id", "value": 50 }
            ]))
            .await
            .unwrap();
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got.description, "final");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn document_patch_that_breaks_shape_is_invalid() {
        let service = service();
        let created = service.create(todo("draft")).await.unwrap();
        let err = service
            .apply_document_patch(created.id, json!([{ "op": "remove", "path": "/description" }]))
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::InvalidPatch(_)));
        assert_eq!(service.get(created.id).await.unwrap().description, "draft");
    }

    #[tokio::test]
    async fn document_patch_on_missing_todo_is_not_found() {
        let service = service();
        let err = service.apply_document_patch(TodoId(5), json!([])).await.unwrap_err();
        assert!(matches!(err, TodoError::NotFound));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let service = service();
        let created = service.create(todo("gone")).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert!(matches!(service.delete(created.id).await, Err(TodoError::NotFound)));
    }
}
