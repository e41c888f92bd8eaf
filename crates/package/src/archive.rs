use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zenith_project::ProjectLayout;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{CompileStep, PackageError};

/// One file stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, relative to the project root with `/` separators.
    pub name: String,
    pub source: PathBuf,
}

/// Files that go into `project.zapp`: `main.c`, everything under `include/`
/// and `manifest.json`, skipping whatever does not exist.
pub fn archive_entries(layout: &ProjectLayout) -> Result<Vec<ArchiveEntry>, PackageError> {
    let mut entries = Vec::new();
    let main = layout.main_source();
    if main.is_file() {
        entries.push(ArchiveEntry {
            name: "main.c".to_string(),
            source: main,
        });
    }

    let include = layout.include_dir();
    if include.is_dir() {
        for entry in WalkDir::new(&include).sort_by_file_name() {
            let entry = entry.map_err(|err| walk_error(&include, err))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(layout.root()) else {
                continue;
            };
            let name = relative
                .components()
                .map(|part| part.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            entries.push(ArchiveEntry {
                name,
                source: entry.path().to_path_buf(),
            });
        }
    }

    let manifest = layout.manifest();
    if manifest.is_file() {
        entries.push(ArchiveEntry {
            name: "manifest.json".to_string(),
            source: manifest,
        });
    }
    Ok(entries)
}

/// Zips the project into `project.zapp`.
///
/// A failed compile aborts before anything is touched. The archive is first
/// written to `project_tmp.zip` and then renamed over the previous one.
pub fn build_archive(
    layout: &ProjectLayout,
    compile: CompileStep,
) -> Result<PathBuf, PackageError> {
    match compile {
        CompileStep::Failed { exit_code } => return Err(PackageError::CompileFailed { exit_code }),
        CompileStep::Skipped => {
            tracing::warn!("compiler unavailable, packaging sources without a native build");
        }
        CompileStep::Succeeded => {}
    }

    let temp = layout.temp_archive();
    let entries = archive_entries(layout)?;
    if entries.is_empty() {
        remove_if_present(&temp)?;
        return Err(PackageError::NothingToPackage);
    }

    if let Err(err) = write_zip(&temp, &entries) {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }

    let archive = layout.archive();
    remove_if_present(&archive)?;
    fs::rename(&temp, &archive).map_err(|source| PackageError::Io {
        path: archive.clone(),
        source,
    })?;
    tracing::info!(path = %archive.display(), entries = entries.len(), "archive built");
    Ok(archive)
}

fn write_zip(path: &Path, entries: &[ArchiveEntry]) -> Result<(), PackageError> {
    let file = File::create(path).map_err(|source| PackageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        zip.start_file(entry.name.as_str(), options)?;
        let mut source = File::open(&entry.source).map_err(|source| PackageError::Io {
            path: entry.source.clone(),
            source,
        })?;
        io::copy(&mut source, &mut zip).map_err(|source| PackageError::Io {
            path: entry.source.clone(),
            source,
        })?;
    }
    zip.finish()?;
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<(), PackageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PackageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> PackageError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(ErrorKind::Other, message));
    PackageError::Io { path, source }
}
