use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Row, SqlitePool};

use crate::domain::{
    error::TodoError,
    repository::TodoRepository,
    todo::{PartialTodo, Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    /// Opens a pool against `database_url`, creating the database file if it
    /// does not exist. In-memory databases are per connection, so callers
    /// using `sqlite::memory:` should pass `max_connections = 1`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<(), TodoError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL CHECK (length(description) <= 256),
                is_completed BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, todo: Todo) -> Result<TodoId, TodoError> {
        let result = sqlx::query("INSERT INTO todos (description, is_completed) VALUES (?1, ?2)")
            .bind(&todo.description)
            .bind(todo.is_completed)
            .execute(&self.pool)
            .await?;
        let id = TodoId(result.last_insert_rowid());
        tracing::debug!(%id, "todo inserted");
        Ok(id)
    }

    async fn get(&self, id: TodoId) -> Result<Todo, TodoError> {
        let row = sqlx::query("SELECT id, description, is_completed FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(row_to_todo(&row)?),
            None => Err(TodoError::NotFound),
        }
    }

    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query("SELECT id, description, is_completed FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let todos = rows.iter().map(row_to_todo).collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    async fn update(&self, todo: Todo) -> Result<(), TodoError> {
        let result = sqlx::query("UPDATE todos SET description = ?2, is_completed = ?3 WHERE id = ?1")
            .bind(todo.id.0)
            .bind(&todo.description)
            .bind(todo.is_completed)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(TodoError::NotFound) }
        Ok(())
    }

    async fn patch(&self, id: TodoId, patch: PartialTodo) -> Result<(), TodoError> {
        let result = sqlx::query(
            "UPDATE todos SET
                description = COALESCE(?2, description),
                is_completed = COALESCE(?3, is_completed)
             WHERE id = ?1",
        )
        .bind(id.0)
        .bind(patch.description)
        .bind(patch.is_completed)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 { return Err(TodoError::NotFound) }
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(TodoError::NotFound) }
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        description: row.try_get("description")?,
        is_completed: row.try_get("is_completed")?,
    })
}
