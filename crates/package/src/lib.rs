//! `.zapp` packaging: the JSON manifest, the deflated project archive and the
//! headless compile-then-package pipeline.

mod archive;
mod manifest;

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zenith_project::ProjectLayout;
use zenith_runexec::{CompileRequest, JobOutcome, RunError, RunExecutor};

pub use archive::{archive_entries, build_archive, ArchiveEntry};
pub use manifest::{write_manifest, Manifest, MANIFEST_BINARY};

/// Errors raised while packaging a project.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("compilation failed with exit code {exit_code:?}, packaging aborted")]
    CompileFailed { exit_code: Option<i32> },
    #[error("nothing to package: main.c, include/ and manifest.json are all missing")]
    NothingToPackage,
    #[error(transparent)]
    Run(#[from] RunError),
}

/// How the native compile preceding packaging went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStep {
    Succeeded,
    /// No compiler was available; sources are packaged anyway.
    Skipped,
    Failed { exit_code: Option<i32> },
}

impl CompileStep {
    pub fn from_outcome(outcome: &JobOutcome) -> Self {
        if outcome.success() {
            CompileStep::Succeeded
        } else {
            CompileStep::Failed {
                exit_code: outcome.exit_code,
            }
        }
    }
}

/// Writes the manifest, compiles with `compiler` when given and builds the
/// archive. Progress lines and compiler output go to `on_line`.
pub fn package<F>(
    layout: &ProjectLayout,
    manifest: &Manifest,
    compiler: Option<&CompileRequest>,
    mut on_line: F,
) -> Result<PathBuf, PackageError>
where
    F: FnMut(&str),
{
    write_manifest(layout, manifest)?;
    on_line("Manifest created: manifest.json");

    let step = match compiler {
        None => CompileStep::Skipped,
        Some(request) => {
            if let Some(notice) = request.notice() {
                on_line(&notice);
            }
            match RunExecutor::execute_streaming(&request.to_job_spec(), &mut on_line) {
                Ok(outcome) => CompileStep::from_outcome(&outcome),
                Err(RunError::ToolMissing { program }) => {
                    on_line(&format!("{program} not found, skipping native compilation."));
                    CompileStep::Skipped
                }
                Err(err) => return Err(err.into()),
            }
        }
    };

    match step {
        CompileStep::Succeeded => on_line("Compilation OK."),
        CompileStep::Failed { .. } => on_line("Compilation failed, aborting .ZAPP packaging."),
        CompileStep::Skipped => {}
    }

    let archive = build_archive(layout, step)?;
    on_line("Packaged -> project.zapp");
    Ok(archive)
}
