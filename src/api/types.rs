use serde::Serialize;

/// POST payload for creating a todo. The server assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub user_id: u32,
}

/// PATCH payload for updating a todo. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            title: None,
            completed: Some(value),
        }
    }

    pub fn title(value: String) -> Self {
        Self {
            title: Some(value),
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_uses_camel_case_user_id() {
        let payload = NewTodo {
            title: "buy milk".to_string(),
            completed: false,
            user_id: 7,
        };
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "buy milk");
        assert_eq!(json["completed"], false);
        assert_eq!(json["userId"], 7);
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let patch = TodoPatch::completed(true);
        let json: serde_json::Value = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["completed"], true);
        assert!(json.get("title").is_none());

        let patch = TodoPatch::title("renamed".to_string());
        let json: serde_json::Value = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["title"], "renamed");
        assert!(json.get("completed").is_none());
    }

    #[test]
    fn test_empty_patch_serializes_to_empty_object() {
        let json = serde_json::to_string(&TodoPatch::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
