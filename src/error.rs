use thiserror::Error;

/// Lookup misses reported by board mutations. None of these leave the board
/// partially modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("list '{id}' not found")]
    ListNotFound { id: String },

    #[error("task '{task_id}' not found in list '{list_id}'")]
    TaskNotFound { list_id: String, task_id: String },

    #[error("index {index} out of range for list '{list_id}' ({len} tasks)")]
    IndexOutOfRange {
        list_id: String,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid board data: {0}")]
    Parse(#[from] serde_json::Error),
}
