//! Input resolution: validate the notebook path and deserialize it.
//!
//! A `.ipynb` file is a single JSON object, so before handing the content
//! to the full parser we check the first non-whitespace byte. That turns
//! "passed the wrong file" (a `.tex`, a CSV) into a targeted error message
//! instead of a serde complaint about line 1 column 1.

use crate::error::NbTexError;
use crate::notebook::Notebook;
use std::path::Path;
use tracing::debug;

/// Load and deserialize the notebook at `path`.
///
/// Fails with [`NbTexError::NotebookNotFound`], [`NbTexError::PermissionDenied`],
/// or [`NbTexError::MalformedNotebook`]. No side effects beyond reading.
pub fn load_notebook(path: &Path) -> Result<Notebook, NbTexError> {
    if !path.exists() {
        return Err(NbTexError::NotebookNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(NbTexError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(NbTexError::MalformedNotebook {
                path: path.to_path_buf(),
                detail: "File is not valid UTF-8".into(),
            });
        }
        Err(_) => {
            return Err(NbTexError::NotebookNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    if !content.trim_start().starts_with('{') {
        return Err(NbTexError::MalformedNotebook {
            path: path.to_path_buf(),
            detail: "Expected a JSON object — is this really a .ipynb file?".into(),
        });
    }

    let notebook: Notebook =
        serde_json::from_str(&content).map_err(|e| NbTexError::MalformedNotebook {
            path: path.to_path_buf(),
            detail: format!("JSON error: {e}"),
        })?;

    debug!(
        "Loaded notebook: {} ({} cells)",
        path.display(),
        notebook.cells.len()
    );
    Ok(notebook)
}
