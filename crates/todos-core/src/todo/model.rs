//! Todo domain model.
//!
//! Field names follow the backend's GraphQL schema (`_id`, camelCase
//! timestamps) so the same types serve as wire payloads.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel id of the single locally created, not-yet-persisted draft.
pub const DRAFT_ID: &str = "new";

/// Title given to a fresh draft.
pub const DRAFT_TITLE: &str = "New Todo";

/// Glyph substituted for `*` when a body is rendered read-only.
pub const BULLET: char = '•';

/// Priority of a todo.
///
/// The backend accepts any enum label, so this stays an open string
/// rather than a closed Rust enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(String);

impl Priority {
    pub const LOW: &'static str = "LOW";
    pub const MEDIUM: &'static str = "MEDIUM";
    pub const HIGH: &'static str = "HIGH";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(Self::LOW.to_string())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One task as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Client-only edit mode flag for an already saved item; never sent.
    #[serde(skip)]
    pub is_editing: bool,
}

impl Todo {
    /// Builds a fresh draft with the default title and a time-stamped body.
    pub fn draft(now: DateTime<Local>) -> Self {
        Self {
            id: DRAFT_ID.to_string(),
            title: DRAFT_TITLE.to_string(),
            body: format!("{} - {}", now.format("%I:%M %p"), DRAFT_TITLE),
            completed: false,
            priority: Priority::default(),
            created_at: None,
            updated_at: None,
            is_editing: false,
        }
    }

    /// Materializes a persisted todo from the server id and the inserted fields.
    pub fn from_fields(id: impl Into<String>, fields: TodoFields) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            body: fields.body,
            completed: fields.completed,
            priority: fields.priority,
            created_at: Some(fields.created_at),
            updated_at: Some(fields.updated_at),
            is_editing: false,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id == DRAFT_ID
    }

    /// Body with the `*` bullet-marker convention expanded.
    pub fn display_body(&self) -> String {
        self.body.replace('*', &BULLET.to_string())
    }

    /// Insert payload carrying this todo's editable fields, stamped with `now`.
    pub fn to_fields(&self, now: DateTime<Utc>) -> TodoFields {
        TodoFields {
            title: self.title.clone(),
            body: self.body.clone(),
            completed: self.completed,
            priority: self.priority.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges every field present in `patch`.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(body) = &patch.body {
            self.body = body.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = &patch.priority {
            self.priority = priority.clone();
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = Some(updated_at);
        }
    }
}

/// Insert input (`TodoInsertInput`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFields {
    pub title: String,
    pub body: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update input (`TodoUpdateInput`); only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TodoPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Filter input (`TodoQueryInput`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoQuery {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id_in", skip_serializing_if = "Option::is_none")]
    pub id_in: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id_in: Some(ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn by_completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// Sort order accepted by the list operation (`TodoSortByInput`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "CREATEDAT_DESC")]
    CreatedAtDesc,
    #[serde(rename = "CREATEDAT_ASC")]
    CreatedAtAsc,
    #[serde(rename = "UPDATEDAT_DESC")]
    UpdatedAtDesc,
    #[serde(rename = "UPDATEDAT_ASC")]
    UpdatedAtAsc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Todo {
        Todo {
            id: "1".to_string(),
            title: "Buy milk".to_string(),
            body: "* oat\n* soy".to_string(),
            completed: false,
            priority: Priority::default(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            updated_at: None,
            is_editing: true,
        }
    }

    #[test]
    fn test_todo_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["_id"], "1");
        assert_eq!(json["priority"], "LOW");
        assert_eq!(json["createdAt"], "2024-03-01T09:30:00Z");
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("isEditing").is_none());
        assert!(json.get("is_editing").is_none());
    }

    #[test]
    fn test_todo_deserializes_server_payload() {
        let todo: Todo = serde_json::from_value(serde_json::json!({
            "_id": "65f0",
            "title": "Read",
            "body": "chapter 3",
            "completed": true,
            "createdAt": "2024-03-01T09:30:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(todo.id, "65f0");
        assert!(todo.completed);
        assert_eq!(todo.priority.as_str(), Priority::LOW);
        assert!(!todo.is_editing);
        assert!(todo.updated_at > todo.created_at);
    }

    #[test]
    fn test_draft_defaults() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 14, 5, 0).unwrap();
        let draft = Todo::draft(now);

        assert!(draft.is_draft());
        assert_eq!(draft.title, "New Todo");
        assert_eq!(draft.body, "02:05 PM - New Todo");
        assert!(!draft.completed);
        assert_eq!(draft.priority.as_str(), "LOW");
        assert!(draft.created_at.is_none());
    }

    #[test]
    fn test_display_body_expands_bullets() {
        assert_eq!(sample().display_body(), "• oat\n• soy");
    }

    #[test]
    fn test_apply_patch_touches_only_present_fields() {
        let mut todo = sample();
        todo.apply(&TodoPatch::new().completed(true));

        let mut expected = sample();
        expected.completed = true;
        assert_eq!(todo, expected);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let json = serde_json::to_value(TodoPatch::new().title("x").completed(false)).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "x", "completed": false }));
        assert!(TodoPatch::new().is_empty());
    }

    #[test]
    fn test_query_and_sort_wire_names() {
        assert_eq!(
            serde_json::to_value(TodoQuery::by_ids(["1", "2"])).unwrap(),
            serde_json::json!({ "_id_in": ["1", "2"] })
        );
        assert_eq!(
            serde_json::to_value(TodoQuery::by_id("7")).unwrap(),
            serde_json::json!({ "_id": "7" })
        );
        assert_eq!(
            serde_json::to_value(SortBy::default()).unwrap(),
            serde_json::json!("CREATEDAT_DESC")
        );
    }
}
