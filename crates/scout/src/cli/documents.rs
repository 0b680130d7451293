//! Reading input documents from disk.
//!
//! Paths may name files or folders. Folders are walked recursively in file-name order;
//! only `.txt` and `.md` files are read, and hidden entries (including the `._` resource
//! forks some archivers leave behind) are skipped.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use scout_pipeline::InputDocument;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// File extensions read as documents.
const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Errors raised while collecting documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A path given on the command line does not exist.
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    /// A file given on the command line is not a text document.
    #[error("unsupported document type: {} (expected .txt or .md)", .0.display())]
    Unsupported(PathBuf),

    /// Reading a file or walking a folder failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Reads every document under `paths`, in argument order.
///
/// Identifiers are the paths as the user would recognize them: the file name for a
/// file argument, or the path relative to the walked folder.
pub fn load_documents(paths: &[PathBuf]) -> Result<Vec<InputDocument>, LoadError> {
    let mut documents = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(LoadError::NotFound(path.clone()));
        }
        if path.is_dir() {
            load_folder(path, &mut documents)?;
        } else if is_document(path) {
            let id = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            documents.push(read_document(path, id)?);
        } else {
            return Err(LoadError::Unsupported(path.clone()));
        }
    }
    debug!("loaded {} documents", documents.len());
    Ok(documents)
}

/// Reads the documents under one folder.
fn load_folder(root: &Path, documents: &mut Vec<InputDocument>) -> Result<(), LoadError> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| LoadError::Read {
            path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !is_document(entry.path()) {
            continue;
        }
        let id = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        documents.push(read_document(entry.path(), id)?);
    }
    Ok(())
}

/// Reads one file, replacing invalid UTF-8.
fn read_document(path: &Path, id: String) -> Result<InputDocument, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} is not valid UTF-8; invalid bytes replaced", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(InputDocument::new(id, text))
}

/// Returns true for names starting with a dot, which covers `._` forks.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Returns true if the path has a document extension.
fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
}
