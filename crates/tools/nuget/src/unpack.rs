//! Zip extraction for `.nupkg` and plain zip packages.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use toolfeed_core::Unpacker;
use tracing::{debug, trace, warn};
use zip::ZipArchive;

use crate::{Error, Result};

/// Extracts zip archives, optionally re-rooting them at an inner directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipUnpacker;

impl ZipUnpacker {
    /// Create an unpacker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive` into `destination` and return the number of files
    /// written.
    ///
    /// With a non-empty `path_prefix` (e.g. `build/_common/`) only entries
    /// below it are extracted and the prefix is removed from their paths.
    /// Entries that would land outside `destination` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read or a file cannot be
    /// written.
    pub fn extract(archive: &Path, path_prefix: &str, destination: &Path) -> Result<usize> {
        let file = File::open(archive)?;
        let mut zip =
            ZipArchive::new(BufReader::new(file)).map_err(|e| Error::archive(archive, e))?;
        let prefix = Path::new(path_prefix.trim_end_matches('/'));

        std::fs::create_dir_all(destination)?;

        let mut extracted = 0;
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(|e| Error::archive(archive, e))?;

            let Some(name) = entry.enclosed_name() else {
                warn!(entry = entry.name(), "Skipping archive entry with unsafe path");
                continue;
            };
            let Some(relative) = strip_entry_prefix(&name, prefix) else {
                trace!(?name, "Entry outside prefix");
                continue;
            };
            if relative.as_os_str().is_empty() {
                continue;
            }

            let out = destination.join(&relative);
            if entry.is_dir() {
                std::fs::create_dir_all(&out)?;
                continue;
            }
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut target = File::create(&out)?;
            io::copy(&mut entry, &mut target)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode))?;
            }

            extracted += 1;
        }

        Ok(extracted)
    }
}

fn strip_entry_prefix(name: &Path, prefix: &Path) -> Option<PathBuf> {
    if prefix.as_os_str().is_empty() {
        return Some(name.to_path_buf());
    }
    name.strip_prefix(prefix).ok().map(Path::to_path_buf)
}

impl Unpacker for ZipUnpacker {
    fn unpack(&self, archive: &Path, path_prefix: &str, destination: &Path) -> bool {
        match Self::extract(archive, path_prefix, destination) {
            Ok(files) => {
                debug!(?archive, ?destination, %path_prefix, files, "Unpacked archive");
                true
            }
            Err(e) => {
                warn!(?archive, ?destination, error = %e, "Failed to unpack archive");
                false
            }
        }
    }
}
