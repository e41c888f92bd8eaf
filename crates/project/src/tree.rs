use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::ProjectError;

/// Label of the synthetic node every scanned tree hangs off.
pub const ROOT_LABEL: &str = "My project >>";

/// The kind of project-node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectNodeKind {
    Folder,
    File,
}

/// A node of the project tree. Paths are absolute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectNode {
    pub name: String,
    pub path: PathBuf,
    pub kind: ProjectNodeKind,
    pub expanded: bool,
    #[serde(default)]
    pub children: Vec<ProjectNode>,
}

impl ProjectNode {
    fn folder(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            kind: ProjectNodeKind::Folder,
            expanded: true,
            children: Vec::new(),
        }
    }

    fn file(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            kind: ProjectNodeKind::File,
            expanded: true,
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ProjectNodeKind::Folder
    }
}

/// Snapshot of the project directory. Rebuilt from scratch on every scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectTree {
    pub root: ProjectNode,
}

impl ProjectTree {
    /// Depth-first iterator over file nodes.
    pub fn files(&self) -> impl Iterator<Item = &ProjectNode> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                stack.extend(node.children.iter().rev());
                if !node.is_folder() {
                    return Some(node);
                }
            }
            None
        })
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }
}

/// Controls which entries a scan keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub extensions: Vec<String>,
    pub skip_hidden_dirs: bool,
    pub root_label: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["c".to_string(), "h".to_string()],
            skip_hidden_dirs: true,
            root_label: ROOT_LABEL.to_string(),
        }
    }
}

impl ScanOptions {
    fn keeps_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|wanted| wanted == ext))
            .unwrap_or(false)
    }

    fn skips_dir(&self, name: &str) -> bool {
        self.skip_hidden_dirs && name.starts_with('.')
    }
}

/// Scans `root` into a tree. Within each directory matching files come first,
/// then subdirectories, both sorted by name. A subdirectory that cannot be
/// read is logged and kept as an empty folder.
pub fn scan_project(root: &Path, options: &ScanOptions) -> Result<ProjectTree, ProjectError> {
    if !root.is_dir() {
        return Err(ProjectError::NotADirectory(root.to_path_buf()));
    }
    let root = absolute(root)?;
    let mut node = ProjectNode::folder(options.root_label.clone(), root.clone());
    node.children = scan_dir(&root, options)?;
    let tree = ProjectTree { root: node };
    tracing::debug!(root = %root.display(), files = tree.file_count(), "project scanned");
    Ok(tree)
}

/// Runs [`scan_project`] on a worker thread; the result arrives on the receiver.
pub fn spawn_scan(
    root: PathBuf,
    options: ScanOptions,
) -> Result<Receiver<Result<ProjectTree, ProjectError>>, ProjectError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("zenith-scan".to_string())
        .spawn(move || {
            let _ = tx.send(scan_project(&root, &options));
        })
        .map_err(|source| ProjectError::Io {
            path: PathBuf::from("<scan thread>"),
            source,
        })?;
    Ok(rx)
}

fn scan_dir(dir: &Path, options: &ScanOptions) -> Result<Vec<ProjectNode>, ProjectError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ProjectError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path().to_path_buf();
        if entry.file_type().is_dir() {
            if !options.skips_dir(&name) {
                dirs.push((name, path));
            }
        } else if path.is_file() && options.keeps_file(&path) {
            files.push(ProjectNode::file(name, path));
        }
    }

    let mut children = files;
    for (name, path) in dirs {
        let mut folder = ProjectNode::folder(name, path);
        match scan_dir(&folder.path, options) {
            Ok(nested) => folder.children = nested,
            Err(err) => tracing::warn!(error = %err, "skipping unreadable directory"),
        }
        children.push(folder);
    }
    Ok(children)
}

fn absolute(path: &Path) -> Result<PathBuf, ProjectError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })
}
