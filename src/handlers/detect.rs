use crate::api::ScanSession;
use crate::error::{LambError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Find manifest files (`.yaml`, `.yml`, `.json`) under `directories`.
///
/// Files are returned in walk order, sorted by name within each directory.
pub fn discover_files(directories: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for dir in directories {
        for entry in walkdir::WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_manifest(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    files
}

fn is_manifest(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str());
    matches!(ext, Some("yaml") | Some("yml") | Some("json"))
}

/// Scan every manifest file under `directories`.
///
/// A file that cannot be read or parsed is logged as a warning and skipped. Returns the
/// number of files scanned successfully.
pub fn handle_detect_files(session: &mut ScanSession, directories: &[PathBuf]) -> usize {
    let files = discover_files(directories);
    log::info!("found {} manifest files", files.len());

    let mut scanned = 0;
    for path in &files {
        match scan_file(session, path) {
            Ok(()) => scanned += 1,
            Err(e) => log::warn!("failed to scan {}: {}", path.display(), e),
        }
    }
    scanned
}

/// Scan one file, or stdin when `file` is `-`.
pub fn handle_detect(session: &mut ScanSession, file: &Path) -> Result<()> {
    if file == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .map_err(|source| LambError::Io {
                path: file.to_path_buf(),
                source,
            })?;
        session.scan_document(&data, None)?;
        return Ok(());
    }
    scan_file(session, file)
}

fn scan_file(session: &mut ScanSession, path: &Path) -> Result<()> {
    let data = std::fs::read(path).map_err(|source| LambError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let found = session.scan_document(&data, Some(path))?.len();
    log::debug!("{}: {} findings", path.display(), found);
    Ok(())
}
