//! Capability-based filesystem checks for command inputs and outputs.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

use crate::CliError;

/// Return whether `path` exists and is a regular file.
fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Require `path` to name an existing regular file, reporting `field` on
/// failure.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> Result<(), CliError> {
    let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) else {
        return Ok(());
    };
    fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|source| {
        CliError::PrepareOutput {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        (tmp, root)
    }

    #[rstest]
    fn existing_file_is_accepted() {
        let (_tmp, root) = workspace();
        let path = root.join("buildings.lsbc");
        std::fs::write(&path, b"LSBC").expect("write file");
        require_existing(&path, "catalog").expect("file exists");
    }

    #[rstest]
    fn missing_file_is_reported() {
        let (_tmp, root) = workspace();
        let err = require_existing(&root.join("absent.lsbc"), "catalog").expect_err("missing");
        assert!(matches!(err, CliError::MissingSourceFile { field: "catalog", .. }));
    }

    #[rstest]
    fn missing_parent_directory_is_reported_as_missing() {
        let (_tmp, root) = workspace();
        let err = require_existing(&root.join("nope/absent.lsbc"), "catalog").expect_err("missing");
        assert!(matches!(err, CliError::MissingSourceFile { .. }));
    }

    #[rstest]
    fn directory_is_not_a_file() {
        let (_tmp, root) = workspace();
        std::fs::create_dir(root.join("dir")).expect("create dir");
        let err = require_existing(&root.join("dir"), "geojson").expect_err("directory");
        assert!(matches!(err, CliError::SourcePathNotFile { field: "geojson", .. }));
    }

    #[rstest]
    fn creates_nested_output_directories() {
        let (_tmp, root) = workspace();
        let target = root.join("a/b/buildings.lsbc");
        ensure_parent_dir(&target).expect("create parents");
        assert!(root.join("a/b").is_dir());
    }
}
