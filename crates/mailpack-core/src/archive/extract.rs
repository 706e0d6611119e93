//! Zip extraction into install directories.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::{MailpackError, Result};

/// Extracts zip payloads received as attachments.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Count the distinct first path segments of the archive's entries.
    pub fn count_top_level_folders(bytes: &[u8]) -> Result<usize> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        let top: HashSet<&str> = archive
            .file_names()
            .filter_map(|name| name.split(['/', '\\']).next())
            .filter(|segment| !segment.is_empty())
            .collect();
        Ok(top.len())
    }

    /// Extract `bytes` below `dest_root` and return the directory written to.
    ///
    /// When `dir_name` is given, or the archive has more than one top-level
    /// entry, everything goes into a new subdirectory named `dir_name` (or
    /// `archive_name` without its extension). A single-folder archive is
    /// extracted directly into `dest_root`.
    pub fn extract_all(
        bytes: &[u8],
        archive_name: &str,
        dest_root: &Path,
        dir_name: Option<&str>,
    ) -> Result<PathBuf> {
        let dest_dir = if dir_name.is_some() || Self::count_top_level_folders(bytes)? > 1 {
            let name = match dir_name {
                Some(name) => name.to_string(),
                None => Path::new(archive_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| archive_name.to_string()),
            };
            dest_root.join(name)
        } else {
            dest_root.to_path_buf()
        };

        fs::create_dir_all(&dest_dir)?;
        Self::extract_into(bytes, &dest_dir)?;
        log::debug!("Extracted {} into {}", archive_name, dest_dir.display());
        Ok(dest_dir)
    }

    fn extract_into(bytes: &[u8], dest_dir: &Path) -> Result<()> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;

            // Rejects absolute paths and `..` components
            let relative = file.enclosed_name().ok_or_else(|| {
                MailpackError::Malformed(format!(
                    "Path traversal detected in archive: {}",
                    file.name()
                ))
            })?;
            let outpath = dest_dir.join(relative);

            if file.is_dir() {
                fs::create_dir_all(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut file, &mut outfile)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
                }
            }
        }

        Ok(())
    }
}
