use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::util::write_atomic;
use crate::ProjectError;

/// Source written by "New Project" when `main.c` does not exist yet.
pub const TEMPLATE_SOURCE: &str =
    "/* new ZenithOS project */\n#include <stdio.h>\nint main(){ printf(\"hi\\n\"); return 0; }\n";

/// Fixed file set of a studio project, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn main_source(&self) -> PathBuf {
        self.root.join("main.c")
    }

    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    pub fn binary(&self) -> PathBuf {
        self.root.join("app")
    }

    pub fn archive(&self) -> PathBuf {
        self.root.join("project.zapp")
    }

    pub fn temp_archive(&self) -> PathBuf {
        self.root.join("project_tmp.zip")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("data").join("settings.json")
    }

    /// Build outputs removed by [`clean_project`].
    pub fn artifacts(&self) -> [PathBuf; 3] {
        [self.binary(), self.archive(), self.manifest()]
    }
}

/// Writes the template `main.c` unless one exists. Returns whether it was created.
pub fn create_new_project(layout: &ProjectLayout) -> Result<bool, ProjectError> {
    let path = layout.main_source();
    if path.exists() {
        return Ok(false);
    }
    write_atomic(&path, TEMPLATE_SOURCE.as_bytes())
        .map_err(|source| ProjectError::io(&path, source))?;
    tracing::info!(path = %path.display(), "created new project");
    Ok(true)
}

/// Reads a source file, replacing invalid UTF-8 sequences.
pub fn read_source(path: &Path) -> Result<String, ProjectError> {
    let bytes = fs::read(path).map_err(|source| ProjectError::io(path, source))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Overwrites `main.c` with the editor contents.
pub fn save_source(layout: &ProjectLayout, text: &str) -> Result<PathBuf, ProjectError> {
    let path = layout.main_source();
    write_atomic(&path, text.as_bytes()).map_err(|source| ProjectError::io(&path, source))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "saved source");
    Ok(path)
}

/// Removes the build artifacts that exist and returns the removed paths.
pub fn clean_project(layout: &ProjectLayout) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for path in layout.artifacts() {
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove artifact");
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn new_project_keeps_existing_source() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        assert!(create_new_project(&layout).unwrap());
        assert_eq!(read_source(&layout.main_source()).unwrap(), TEMPLATE_SOURCE);

        save_source(&layout, "int main(){return 1;}").unwrap();
        assert!(!create_new_project(&layout).unwrap());
        assert_eq!(
            read_source(&layout.main_source()).unwrap(),
            "int main(){return 1;}"
        );
    }

    #[test]
    fn read_source_decodes_lossily() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.c");
        fs::write(&path, [b'a', 0xFF, b'b']).unwrap();
        assert_eq!(read_source(&path).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn read_missing_source_reports_path() {
        let dir = tempdir().unwrap();
        let err = read_source(&dir.path().join("main.c")).unwrap_err();
        assert!(err.to_string().contains("main.c"));
    }

    #[test]
    fn clean_removes_only_artifacts() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        fs::write(layout.main_source(), "x").unwrap();
        fs::write(layout.binary(), "x").unwrap();
        fs::write(layout.manifest(), "{}").unwrap();

        let removed = clean_project(&layout);
        assert_eq!(removed, vec![layout.binary(), layout.manifest()]);
        assert!(layout.main_source().exists());
        assert!(clean_project(&layout).is_empty());
    }
}
