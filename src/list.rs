use crate::task::Task;
use serde::{Deserialize, Serialize};

/// A column on the board. Task order is the on-screen order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct List {
    pub id: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl List {
    pub fn new(id: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id: id.into(),
            tasks,
        }
    }

    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// Body returned by the board endpoint: `{ "list": [...] }`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BoardPayload {
    #[serde(default)]
    pub list: Vec<List>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_with_and_without_tasks() {
        let json = r#"{
            "list": [
                { "id": "1", "tasks": [
                    { "id": "a", "description": "d", "date": "2021-01-01", "priority": "low" }
                ] },
                { "id": "2" }
            ]
        }"#;
        let payload: BoardPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.list.len(), 2);
        assert_eq!(payload.list[0].tasks.len(), 1);
        assert!(payload.list[1].tasks.is_empty());
        assert_eq!(payload.list[0].position_of("a"), Some(0));
        assert_eq!(payload.list[0].position_of("zz"), None);
    }

    #[test]
    fn empty_object_is_an_empty_board() {
        let payload: BoardPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.list.is_empty());
    }
}
