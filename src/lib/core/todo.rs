use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TodoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

/// Body of `POST /todos`. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTodo {
    pub title: String,
    pub content: String,
}

/// Body of `PUT /todos/{id}`.
///
/// Absent (or `null`) fields keep their stored value. `id` is accepted so a
/// whole `Todo` can be sent back as-is, but it has to match the path id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn validate_for(&self, id: Uuid) -> Result<(), TodoError> {
        match self.id {
            Some(body_id) if body_id != id => Err(TodoError::Validation(format!(
                "body id {body_id} does not match path id {id}"
            ))),
            _ => Ok(()),
        }
    }
}

impl From<&Todo> for TodoPatch {
    fn from(todo: &Todo) -> Self {
        Self {
            id: Some(todo.id),
            title: Some(todo.title.clone()),
            content: Some(todo.content.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_hyphenated_id() {
        let todo = Todo {
            id: Uuid::nil(),
            title: "Buy milk".to_string(),
            content: "2%".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["content"], "2%");
    }

    #[test]
    fn new_todo_requires_both_fields() {
        let missing_content: Result<NewTodo, _> = serde_json::from_str(r#"{"title":"x"}"#);
        assert!(missing_content.is_err());
        let missing_title: Result<NewTodo, _> = serde_json::from_str(r#"{"content":"x"}"#);
        assert!(missing_title.is_err());
    }

    #[test]
    fn new_todo_rejects_unknown_fields() {
        let result: Result<NewTodo, _> =
            serde_json::from_str(r#"{"title":"x","content":"y","id":"00000000-0000-0000-0000-000000000000"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_fields_are_optional() {
        let patch: TodoPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, TodoPatch::default());

        let patch: TodoPatch = serde_json::from_str(r#"{"title":"Buy oat milk"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Buy oat milk"));
        assert!(patch.content.is_none());
    }

    #[test]
    fn patch_null_means_unchanged() {
        let patch: TodoPatch = serde_json::from_str(r#"{"title":null,"content":"c"}"#).unwrap();
        assert!(patch.title.is_none());
        assert_eq!(patch.content.as_deref(), Some("c"));
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let result: Result<TodoPatch, _> = serde_json::from_str(r#"{"title":"x","owner":"me"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_skips_absent_fields_when_serialized() {
        let body = serde_json::to_value(TodoPatch::title("only")).unwrap();
        assert_eq!(body, serde_json::json!({ "title": "only" }));
    }

    #[test]
    fn patch_id_must_match_path() {
        let id = Uuid::new_v4();
        let todo = Todo {
            id,
            title: "t".to_string(),
            content: "c".to_string(),
        };
        let patch = TodoPatch::from(&todo);
        assert!(patch.validate_for(id).is_ok());
        assert!(TodoPatch::content("c").validate_for(id).is_ok());

        let err = patch.validate_for(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }
}
