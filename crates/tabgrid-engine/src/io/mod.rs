use crate::editing::Session;
use crate::layout::LayoutParameters;
use crate::persist::{PersistedState, StateError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid state file {path}: {source}")]
    InvalidState { path: PathBuf, source: StateError },
}

/// Read persisted state from `path`; `Ok(None)` when no file exists yet
pub fn load_state(path: &Path) -> Result<Option<PersistedState>, IoError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    PersistedState::from_json(&content)
        .map(Some)
        .map_err(|source| IoError::InvalidState {
            path: path.to_path_buf(),
            source,
        })
}

/// Write state to `path`, replacing any previous file in one rename
pub fn save_state(path: &Path, state: &PersistedState) -> Result<(), IoError> {
    let json = state
        .to_json()
        .map_err(|source| IoError::InvalidState {
            path: path.to_path_buf(),
            source,
        })?;
    write_atomic(path, &json)
}

/// Load the session stored at `path`.
///
/// A missing, unreadable or malformed file yields a fresh session with `defaults`.
pub fn load_session(path: &Path, defaults: LayoutParameters) -> Session {
    let content = if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => {
                log::info!("Restoring session from {}", path.display());
                Some(content)
            }
            Err(e) => {
                log::warn!("Could not read state from {}: {e}", path.display());
                None
            }
        }
    } else {
        None
    };
    Session::restore_or_default(content.as_deref(), defaults)
}

pub fn save_session(path: &Path, session: &Session) -> Result<(), IoError> {
    save_state(path, &session.to_persisted())
}

/// Write formatted tablature text to `path`
pub fn export_text(path: &Path, text: &str) -> Result<(), IoError> {
    write_atomic(path, text)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
