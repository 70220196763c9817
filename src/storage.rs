use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::api::types::FavoriteQuestionList;
use crate::error::StorageError;

/// Slugs the user has already solved.
pub type SolvedSet = HashSet<String>;

/// Writes `value` as indented JSON, creating parent directories first.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            action: "failed to create directory",
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let data = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| StorageError::Io {
        action: "failed to write",
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "saved");
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let data = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        action: "failed to read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    data: FavoriteListEnvelope,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteListEnvelope {
    favorite_question_list: FavoriteQuestionList,
}

/// Loads a saved favorite list. Accepts both the accumulated list and a raw
/// `favoriteQuestionList` response body; anything with a top-level `data`
/// key is decoded as the latter.
pub fn load_snapshot(path: &Path) -> Result<FavoriteQuestionList, StorageError> {
    let value: serde_json::Value = load_json(path)?;
    let decoded = if value.get("data").is_some() {
        serde_json::from_value::<ResponseEnvelope>(value).map(|r| r.data.favorite_question_list)
    } else {
        serde_json::from_value(value)
    };
    decoded.map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads one slug per line, ignoring blank lines. A missing file is an
/// empty set.
pub fn read_solved(path: &Path) -> Result<SolvedSet, StorageError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "solved file '{}' not found, assuming no questions solved yet",
                path.display()
            );
            return Ok(SolvedSet::new());
        }
        Err(source) => {
            return Err(StorageError::Io {
                action: "failed to read",
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let solved: SolvedSet = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    info!(
        "loaded {} solved questions from '{}'",
        solved.len(),
        path.display()
    );
    Ok(solved)
}
