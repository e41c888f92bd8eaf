//! Project files of a ZenithOS studio project: the tree scanner, the fixed
//! file layout and the `include/` plugin headers.

mod util;

pub mod layout;
pub mod plugins;
pub mod tree;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use layout::{
    clean_project, create_new_project, read_source, save_source, ProjectLayout, TEMPLATE_SOURCE,
};
pub use plugins::{add_plugin, list_plugins, PluginAddOutcome};
pub use tree::{
    scan_project, spawn_scan, ProjectNode, ProjectNodeKind, ProjectTree, ScanOptions, ROOT_LABEL,
};
pub use util::write_atomic;

/// Errors raised while reading or writing project files.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("project root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("{0} is not a header file")]
    NotAHeader(PathBuf),
    #[error("{0} is already in the include directory")]
    SamePlugin(PathBuf),
}

impl ProjectError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
