use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, ScanError};

/// Enumerates step-definition files from glob patterns and yields their
/// lines. A pattern that matches nothing is an empty listing, not an error;
/// an unreadable file is.
#[derive(Clone, Debug)]
pub struct FileSource {
    patterns: Vec<String>,
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new(patterns: Vec<String>, root: Option<PathBuf>) -> Self {
        FileSource { patterns, root }
    }

    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for pattern in &self.patterns {
            let resolved = self.resolve(pattern)?;
            let entries = glob::glob(&resolved).map_err(|source| ScanError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            for entry in entries {
                files.push(entry?);
            }
        }
        debug!("{} step file(s) matched", files.len());
        Ok(files)
    }

    fn resolve(&self, pattern: &str) -> Result<String> {
        if Path::new(pattern).is_absolute() {
            return Ok(pattern.to_string());
        }
        match &self.root {
            Some(root) => Ok(root.join(pattern).to_string_lossy().into_owned()),
            None => Err(ScanError::NoRoot {
                pattern: pattern.to_string(),
            }),
        }
    }

    /// Reads a file as ordered lines, trailing newlines stripped. UTF-8
    /// expected; open or decode failure propagates to the caller.
    pub fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            lines.push(line.map_err(|source| ScanError::Io {
                path: path.to_path_buf(),
                source,
            })?);
        }
        trace!("read {} line(s) from {}", lines.len(), path.display());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_zero_match_pattern_is_empty_not_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = FileSource::new(
            vec!["steps/steps_*.py".into()],
            Some(dir.path().to_path_buf()),
        );
        assert_eq!(source.list_files().expect("list"), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_relative_pattern_without_root_fails() {
        let source = FileSource::new(vec!["steps/steps_*.py".into()], None);
        assert!(matches!(
            source.list_files(),
            Err(ScanError::NoRoot { .. })
        ));
    }

    #[test]
    fn test_lists_and_reads_matching_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("steps")).expect("mkdir");
        fs::write(
            dir.path().join("steps/steps_a.py"),
            "@Given('a')\ndef impl(context):\n",
        )
        .expect("write");
        fs::write(dir.path().join("steps/other.txt"), "not a step file").expect("write");

        let source = FileSource::new(
            vec!["steps/steps_*.py".into()],
            Some(dir.path().to_path_buf()),
        );
        let files = source.list_files().expect("list");
        assert_eq!(files.len(), 1);
        let lines = source.read_lines(&files[0]).expect("read");
        assert_eq!(lines, vec!["@Given('a')".to_string(), "def impl(context):".to_string()]);
    }

    #[test]
    fn test_missing_file_propagates_io_error() {
        let source = FileSource::new(vec![], None);
        assert!(matches!(
            source.read_lines(Path::new("/nonexistent/steps.py")),
            Err(ScanError::Io { .. })
        ));
    }
}
