//! Installed projects on disk.
//!
//! Every retrieved project lives in `<root>/<name><separator><version>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub root: PathBuf,
    pub separator: String,
    /// Entry-point file that marks a project as runnable.
    pub run_file: String,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>, separator: impl Into<String>, run_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            separator: separator.into(),
            run_file: run_file.into(),
        }
    }

    /// Directory name of a project, e.g. `Demo-1.0`.
    pub fn dir_name(&self, name: &str, version: &str) -> String {
        format!("{}{}{}", name, self.separator, version)
    }

    pub fn project_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(self.dir_name(name, version))
    }

    pub fn project_exists(&self, name: &str, version: &str) -> bool {
        self.project_dir(name, version).is_dir()
    }

    /// Locate the entry-point file anywhere below the project directory.
    pub fn find_run_file(&self, name: &str, version: &str) -> Option<PathBuf> {
        let dir = self.project_dir(name, version);
        if !dir.is_dir() {
            return None;
        }

        WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == self.run_file.as_str())
            .map(|entry| entry.into_path())
    }

    pub fn project_runnable(&self, name: &str, version: &str) -> bool {
        self.find_run_file(name, version).is_some()
    }

    /// Remove an installed project. Returns whether anything was deleted.
    pub fn delete_project(&self, name: &str, version: &str) -> Result<bool> {
        let dir = self.project_dir(name, version);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                log::info!("Deleted {}", dir.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of the directories currently under the install root, sorted.
    pub fn installed(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout(root: &Path) -> InstallLayout {
        InstallLayout::new(root, "-", "main.py")
    }

    #[test]
    fn test_dir_name() {
        let layout = InstallLayout::new("/opt/projects", "_v", "main.py");
        assert_eq!(layout.dir_name("Demo", "1.0"), "Demo_v1.0");
        assert_eq!(
            layout.project_dir("Demo", "1.0"),
            PathBuf::from("/opt/projects/Demo_v1.0")
        );
    }

    #[test]
    fn test_exists_and_runnable() {
        let root = TempDir::new().unwrap();
        let layout = layout(root.path());

        assert!(!layout.project_exists("Demo", "1.0"));
        assert!(!layout.project_runnable("Demo", "1.0"));

        let nested = root.path().join("Demo-1.0").join("game");
        fs::create_dir_all(&nested).unwrap();
        assert!(layout.project_exists("Demo", "1.0"));
        assert!(!layout.project_runnable("Demo", "1.0"));

        fs::write(nested.join("main.py"), "print('hi')").unwrap();
        assert!(layout.project_runnable("Demo", "1.0"));
        assert_eq!(
            layout.find_run_file("Demo", "1.0").unwrap(),
            nested.join("main.py")
        );
    }

    #[test]
    fn test_delete_project() {
        let root = TempDir::new().unwrap();
        let layout = layout(root.path());
        fs::create_dir_all(root.path().join("Demo-1.0").join("sub")).unwrap();
        fs::write(root.path().join("Demo-1.0/sub/file.txt"), "x").unwrap();

        assert!(layout.delete_project("Demo", "1.0").unwrap());
        assert!(!layout.project_exists("Demo", "1.0"));
        assert!(!layout.delete_project("Demo", "1.0").unwrap());
    }

    #[test]
    fn test_installed() {
        let root = TempDir::new().unwrap();
        let layout = layout(&root.path().join("missing"));
        assert!(layout.installed().unwrap().is_empty());

        let layout = InstallLayout::new(root.path(), "-", "main.py");
        fs::create_dir_all(root.path().join("b-2.0")).unwrap();
        fs::create_dir_all(root.path().join("a-1.0")).unwrap();
        fs::write(root.path().join("stray.txt"), "x").unwrap();
        assert_eq!(layout.installed().unwrap(), vec!["a-1.0", "b-2.0"]);
    }
}
