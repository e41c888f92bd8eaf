use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::layout::ProjectLayout;
use crate::ProjectError;

/// Result of copying a header into `include/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginAddOutcome {
    Added(PathBuf),
    /// A header with the same name is present and `overwrite` was not set.
    AlreadyExists(PathBuf),
}

/// Header files in `include/`, sorted by name. A missing directory lists nothing.
pub fn list_plugins(layout: &ProjectLayout) -> Result<Vec<String>, ProjectError> {
    let dir = layout.include_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(ProjectError::io(&dir, source)),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ProjectError::io(&dir, source))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".h") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Copies `source` into `include/`, creating the directory when needed.
pub fn add_plugin(
    layout: &ProjectLayout,
    source: &Path,
    overwrite: bool,
) -> Result<PluginAddOutcome, ProjectError> {
    let file_name = source
        .file_name()
        .filter(|_| source.extension().is_some_and(|ext| ext == "h"))
        .ok_or_else(|| ProjectError::NotAHeader(source.to_path_buf()))?;
    let dir = layout.include_dir();
    fs::create_dir_all(&dir).map_err(|err| ProjectError::io(&dir, err))?;

    let target = dir.join(file_name);
    if target.exists() {
        if !overwrite {
            return Ok(PluginAddOutcome::AlreadyExists(target));
        }
        let same = fs::canonicalize(source)
            .and_then(|from| fs::canonicalize(&target).map(|to| from == to))
            .map_err(|err| ProjectError::io(source, err))?;
        if same {
            return Err(ProjectError::SamePlugin(target));
        }
    }
    fs::copy(source, &target).map_err(|err| ProjectError::io(source, err))?;
    tracing::info!(plugin = %target.display(), "plugin added");
    Ok(PluginAddOutcome::Added(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn listing_is_sorted_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        assert!(list_plugins(&layout).unwrap().is_empty());

        fs::create_dir_all(layout.include_dir()).unwrap();
        for name in ["zsapi.h", "README", "audio.h", "notes.c"] {
            fs::write(layout.include_dir().join(name), "").unwrap();
        }
        assert_eq!(list_plugins(&layout).unwrap(), vec!["audio.h", "zsapi.h"]);
    }

    #[test]
    fn re_adding_a_header_from_include_keeps_its_contents() {
        let project = tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        fs::create_dir_all(layout.include_dir()).unwrap();
        let header = layout.include_dir().join("net.h");
        fs::write(&header, "int net_init(void);\n").unwrap();

        let err = add_plugin(&layout, &header, true).unwrap_err();
        assert!(matches!(err, ProjectError::SamePlugin(_)));
        assert_eq!(fs::read_to_string(&header).unwrap(), "int net_init(void);\n");

        let outcome = add_plugin(&layout, &header, false).unwrap();
        assert_eq!(outcome, PluginAddOutcome::AlreadyExists(header));
    }

    #[test]
    fn add_respects_overwrite_flag() {
        let project = tempdir().unwrap();
        let downloads = tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        let header = downloads.path().join("net.h");
        fs::write(&header, "v1").unwrap();

        let added = add_plugin(&layout, &header, false).unwrap();
        let target = layout.include_dir().join("net.h");
        assert_eq!(added, PluginAddOutcome::Added(target.clone()));

        fs::write(&header, "v2").unwrap();
        assert_eq!(
            add_plugin(&layout, &header, false).unwrap(),
            PluginAddOutcome::AlreadyExists(target.clone())
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "v1");

        add_plugin(&layout, &header, true).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "v2");
    }

    #[test]
    fn non_headers_are_rejected() {
        let project = tempdir().unwrap();
        let layout = ProjectLayout::new(project.path());
        let source = project.path().join("main.c");
        fs::write(&source, "").unwrap();
        assert!(matches!(
            add_plugin(&layout, &source, true),
            Err(ProjectError::NotAHeader(_))
        ));
    }
}
