//! One-shot initial load of the board.

use crate::error::LoadError;
use crate::list::{BoardPayload, List};
use crate::store::BoardStore;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Http(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }
}

pub async fn fetch_board(source: &DataSource) -> Result<Vec<List>, LoadError> {
    let payload = match source {
        DataSource::Http(url) => fetch_url(url).await?,
        DataSource::File(path) => read_file(path)?,
    };
    Ok(payload.list)
}

async fn fetch_url(url: &str) -> Result<BoardPayload, LoadError> {
    let payload = reqwest::get(url)
        .await?
        .error_for_status()?
        .json::<BoardPayload>()
        .await?;
    Ok(payload)
}

fn read_file(path: &Path) -> Result<BoardPayload, LoadError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Fills `store` from `source`. Failures are logged and leave the store as
/// it was. Returns whether the store was populated.
pub async fn load_initial_data(store: &mut BoardStore, source: &DataSource) -> bool {
    match fetch_board(source).await {
        Ok(lists) => {
            info!(lists = lists.len(), ?source, "board loaded");
            store.set_lists(lists);
            true
        }
        Err(err) => {
            error!(%err, ?source, "failed to load board");
            false
        }
    }
}
