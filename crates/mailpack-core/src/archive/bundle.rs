//! Zip bundle built incrementally in a private temporary directory.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{MailpackError, Result};

/// A zip archive under construction.
///
/// The archive lives in its own temporary directory until [`clear`] is
/// called or the bundle is dropped.
///
/// [`clear`]: ArchiveBundle::clear
pub struct ArchiveBundle {
    temp_dir: Option<TempDir>,
    zip_path: PathBuf,
    file_name: String,
    writer: Option<ZipWriter<File>>,
}

impl ArchiveBundle {
    /// Create an empty bundle named `file_name`.
    ///
    /// The backing directory is created under `temp_root`, or the system
    /// temp dir when none is given.
    pub fn new(file_name: &str, temp_root: Option<&Path>) -> Result<Self> {
        let temp_dir = match temp_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                tempfile::Builder::new().prefix("mailpack-").tempdir_in(root)?
            }
            None => tempfile::Builder::new().prefix("mailpack-").tempdir()?,
        };

        let file_name = sanitize_file_name(file_name);
        let zip_path = temp_dir.path().join(&file_name);
        log::debug!("New archive bundle at {}", zip_path.display());

        Ok(Self {
            temp_dir: Some(temp_dir),
            zip_path,
            file_name,
            writer: None,
        })
    }

    /// Attachment file name of the bundle, e.g. `Demo.zip`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Location of the zip store on disk.
    pub fn path(&self) -> &Path {
        &self.zip_path
    }

    pub fn is_cleared(&self) -> bool {
        self.temp_dir.is_none()
    }

    /// Add a single file, keyed by its base name only.
    ///
    /// `D:/abc/def.ghi` becomes the entry `def.ghi`.
    pub fn attach_file(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| not_found(path))?;
        let data = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => not_found(path),
            _ => MailpackError::Io(e),
        })?;

        self.write_entry(&name, &data)?;
        log::debug!("Attached {} as {}", path.display(), name);
        Ok(())
    }

    /// Add every file below `path`, keyed by its path relative to `path`.
    ///
    /// The folder's own name is stripped: `D:/abc/def/sub/x.txt` attached
    /// from `D:/abc/def` becomes the entry `sub/x.txt`. Returns the number
    /// of files added.
    pub fn attach_folder(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(not_found(path));
        }

        let mut count = 0;
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = match entry.path().strip_prefix(path) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let name = entry_name(relative);
            if name.is_empty() {
                continue;
            }

            let data = fs::read(entry.path())?;
            self.write_entry(&name, &data)?;
            count += 1;
        }

        log::debug!("Attached {} files from {}", count, path.display());
        Ok(count)
    }

    /// Finish the zip store and read it back.
    ///
    /// Attaching after finalizing reopens the store in append mode.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        self.writer()?;
        if let Some(writer) = self.writer.take() {
            writer.finish()?;
        }
        Ok(fs::read(&self.zip_path)?)
    }

    /// Delete the backing temporary directory. Idempotent.
    pub fn clear(&mut self) -> Result<()> {
        self.writer = None;
        if let Some(dir) = self.temp_dir.take() {
            log::debug!("Removing {}", dir.path().display());
            dir.close()?;
        }
        Ok(())
    }

    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let writer = self.writer()?;
        writer.start_file(name, options)?;
        writer.write_all(data)?;
        Ok(())
    }

    fn writer(&mut self) -> Result<&mut ZipWriter<File>> {
        if self.writer.is_none() {
            if self.temp_dir.is_none() {
                return Err(MailpackError::InvalidState(
                    "This archive bundle has already been cleared.".to_string(),
                ));
            }

            let writer = if self.zip_path.exists() {
                let file = OpenOptions::new().read(true).write(true).open(&self.zip_path)?;
                ZipWriter::new_append(file)?
            } else {
                ZipWriter::new(File::create(&self.zip_path)?)
            };
            self.writer = Some(writer);
        }

        self.writer.as_mut().ok_or_else(|| {
            MailpackError::InvalidState("Archive bundle writer is unavailable.".to_string())
        })
    }
}

fn not_found(path: &Path) -> MailpackError {
    MailpackError::NotFound(format!("Can not find {}", path.display()))
}

/// Forward-slash entry name from a relative path.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn test_attach_file_uses_base_name() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("abc")).unwrap();
        let file = src.path().join("abc").join("def.ghi");
        fs::write(&file, "content").unwrap();

        let mut bundle = ArchiveBundle::new("Demo.zip", None).unwrap();
        bundle.attach_file(&file).unwrap();
        let bytes = bundle.finalize().unwrap();

        assert_eq!(entry_names(&bytes), vec!["def.ghi"]);
    }

    #[test]
    fn test_attach_missing_file() {
        let mut bundle = ArchiveBundle::new("Demo.zip", None).unwrap();
        let err = bundle.attach_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, MailpackError::NotFound(_)));
    }

    #[test]
    fn test_attach_folder_strips_folder_name() {
        let src = TempDir::new().unwrap();
        let folder = src.path().join("F");
        fs::create_dir_all(folder.join("sub").join("deeper")).unwrap();
        fs::write(folder.join("a.txt"), "a").unwrap();
        fs::write(folder.join("sub").join("b.txt"), "b").unwrap();
        fs::write(folder.join("sub").join("deeper").join("c.txt"), "c").unwrap();

        let mut bundle = ArchiveBundle::new("Demo.zip", None).unwrap();
        assert_eq!(bundle.attach_folder(&folder).unwrap(), 3);
        let bytes = bundle.finalize().unwrap();

        assert_eq!(
            entry_names(&bytes),
            vec!["a.txt", "sub/b.txt", "sub/deeper/c.txt"]
        );
    }

    #[test]
    fn test_published_folder_layout_on_extract() {
        use crate::archive::ArchiveExtractor;

        // Loose files next to a subfolder: two top-level entries, so wrapped
        let src = TempDir::new().unwrap();
        let folder = src.path().join("F");
        fs::create_dir_all(folder.join("sub")).unwrap();
        fs::write(folder.join("a.txt"), "a").unwrap();
        fs::write(folder.join("sub").join("b.txt"), "b").unwrap();

        let mut bundle = ArchiveBundle::new("Demo.zip", None).unwrap();
        bundle.attach_folder(&folder).unwrap();
        let bytes = bundle.finalize().unwrap();
        assert_eq!(ArchiveExtractor::count_top_level_folders(&bytes).unwrap(), 2);

        let dest = TempDir::new().unwrap();
        let written = ArchiveExtractor::extract_all(&bytes, "Demo.zip", dest.path(), None).unwrap();
        assert_eq!(written, dest.path().join("Demo"));
        assert_eq!(fs::read_to_string(written.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(written.join("sub/b.txt")).unwrap(), "b");
        assert!(!dest.path().join("a.txt").exists());

        // A folder holding a single subfolder keeps that subfolder as the only root
        let folder = src.path().join("G");
        fs::create_dir_all(folder.join("app")).unwrap();
        fs::write(folder.join("app").join("main.py"), "print(1)").unwrap();

        let mut bundle = ArchiveBundle::new("Tool.zip", None).unwrap();
        bundle.attach_folder(&folder).unwrap();
        let bytes = bundle.finalize().unwrap();
        assert_eq!(ArchiveExtractor::count_top_level_folders(&bytes).unwrap(), 1);

        let dest = TempDir::new().unwrap();
        let written = ArchiveExtractor::extract_all(&bytes, "Tool.zip", dest.path(), None).unwrap();
        assert_eq!(written, dest.path());
        assert!(dest.path().join("app/main.py").exists());
        assert!(!dest.path().join("G").exists());
    }

    #[test]
    fn test_attach_missing_folder() {
        let src = TempDir::new().unwrap();
        let mut bundle = ArchiveBundle::new("Demo.zip", None).unwrap();
        let err = bundle.attach_folder(&src.path().join("missing")).unwrap_err();
        assert!(matches!(err, MailpackError::NotFound(_)));
    }

    #[test]
    fn test_finalize_empty_bundle() {
        let mut bundle = ArchiveBundle::new("Empty.zip", None).unwrap();
        let bytes = bundle.finalize().unwrap();
        assert!(entry_names(&bytes).is_empty());
    }

    #[test]
    fn test_attach_after_finalize_appends() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("one.txt"), "1").unwrap();
        fs::write(src.path().join("two.txt"), "2").unwrap();

        let mut bundle = ArchiveBundle::new("Demo.zip", None).unwrap();
        bundle.attach_file(&src.path().join("one.txt")).unwrap();
        bundle.finalize().unwrap();
        bundle.attach_file(&src.path().join("two.txt")).unwrap();
        let bytes = bundle.finalize().unwrap();

        assert_eq!(entry_names(&bytes), vec!["one.txt", "two.txt"]);
    }

    #[test]
    fn test_clear_removes_temp_storage() {
        let root = TempDir::new().unwrap();
        let mut bundle = ArchiveBundle::new("Demo.zip", Some(root.path())).unwrap();
        bundle.finalize().unwrap();
        let zip_path = bundle.path().to_path_buf();
        assert!(zip_path.exists());

        bundle.clear().unwrap();
        bundle.clear().unwrap();
        assert!(bundle.is_cleared());
        assert!(!zip_path.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);

        let err = bundle.finalize().unwrap_err();
        assert!(matches!(err, MailpackError::InvalidState(_)));
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let bundle = ArchiveBundle::new("a/b\\c.zip", None).unwrap();
        assert_eq!(bundle.file_name(), "a_b_c.zip");
    }
}
