//! Line-oriented state files shared by the favorites and history stores

use crate::{CoreError, Result};
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temp-file-then-rename pattern.
///
/// A crash during the write leaves the old file intact.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read the non-empty lines of a state file; a missing file reads as empty
pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::Store {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Replace a state file with the given lines
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    atomic_write(path, content.as_bytes()).map_err(|e| CoreError::Store {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a/b/state");
        atomic_write(&path, b"hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state");
        atomic_write(&path, b"x").unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1, "Temp file left behind");
    }

    #[test]
    fn test_lines_round_trip_skips_blanks() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state");
        std::fs::write(&path, "one\n\ntwo\r\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["one", "two"]);

        write_lines(&path, &["three".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three\n");

        write_lines(&path, &[]).unwrap();
        assert!(read_lines(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_lines(&tmp.path().join("absent")).unwrap().is_empty());
    }
}
