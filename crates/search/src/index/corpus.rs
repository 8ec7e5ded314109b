//! Chunk file loading
//!
//! A chunk directory holds `*.txt` files; each file contains chunks separated
//! by a delimiter line.

use kagforge_common::errors::{AppError, Result};
use kagforge_common::models::Chunk;
use std::path::Path;
use tracing::{debug, info};

/// Load every chunk from the `*.txt` files of a directory.
///
/// Files are read in name order. Chunks are trimmed and empty ones dropped;
/// ids are `"{file_stem}#{n}"` counting only kept chunks. An empty delimiter
/// is rejected.
pub fn load_chunks_dir(dir: impl AsRef<Path>, delimiter: &str) -> Result<Vec<Chunk>> {
    let dir = dir.as_ref();
    if delimiter.is_empty() {
        return Err(AppError::InvalidFormat {
            message: "chunk delimiter must not be empty".to_string(),
        });
    }
    if !dir.is_dir() {
        return Err(AppError::NotFound {
            resource_type: "chunk directory".to_string(),
            id: dir.display().to_string(),
        });
    }

    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    let mut chunks = Vec::new();
    for path in &files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let raw = std::fs::read_to_string(path)?;

        let before = chunks.len();
        chunks.extend(
            raw.split(delimiter)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .enumerate()
                .map(|(n, text)| Chunk::new(format!("{}#{}", stem, n), text)),
        );
        debug!(file = %path.display(), chunks = chunks.len() - before, "Loaded chunk file");
    }

    info!(dir = %dir.display(), files = files.len(), chunks = chunks.len(), "Loaded corpus");
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trim_and_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second file\n---\n   \n---\nlast").unwrap();
        std::fs::write(dir.path().join("a.txt"), "  first chunk  \n---\nsecond chunk").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let chunks = load_chunks_dir(dir.path(), "\n---\n").unwrap();
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        assert_eq!(ids, vec!["a#0", "a#1", "b#0", "b#1"]);
        assert_eq!(texts, vec!["first chunk", "second chunk", "second file", "last"]);
    }

    #[test]
    fn test_missing_directory() {
        let err = load_chunks_dir("/no/such/chunks", "\n---\n").unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "text").unwrap();

        let err = load_chunks_dir(dir.path(), "").unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat { .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_empty_directory_yields_no_chunks() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_chunks_dir(dir.path(), "\n---\n").unwrap().is_empty());
    }
}
