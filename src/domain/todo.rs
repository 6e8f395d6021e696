use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use super::error::TodoError;

pub const MAX_DESCRIPTION_LEN: usize = 256;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl std::str::FromStr for TodoId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(TodoId)
            .map_err(|_| TodoError::InvalidId(s.to_string()))
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    // the store or the request path decides the id, never the body
    #[serde(default, deserialize_with = "ignore_id")]
    pub id: TodoId,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
}

impl Todo {
    pub fn validate(&self) -> Result<(), TodoError> {
        validate_description(&self.description)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartialTodo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl PartialTodo {
    pub fn validate(&self) -> Result<(), TodoError> {
        match &self.description {
            Some(d) => validate_description(d),
            None => Ok(()),
        }
    }

    pub fn merge_into(self, todo: &mut Todo) {
        if let Some(d) = self.description { todo.description = d; }
        if let Some(c) = self.is_completed { todo.is_completed = c; }
    }
}

fn ignore_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TodoId, D::Error> {
    IgnoredAny::deserialize(deserializer)?;
    Ok(TodoId::default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_description(description: &str) -> Result<(), TodoError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(TodoError::Validation(format!(
            "description is {len} characters long, the maximum is {MAX_DESCRIPTION_LEN}"
        )));
    }
    Ok(())
}
