//! Starts installed projects.

use std::process::{Child, Command};

use crate::project::InstallLayout;
use crate::{MailpackError, Result};

/// Runs a project's entry-point file with a fixed interpreter.
#[derive(Debug, Clone)]
pub struct Launcher {
    interpreter: String,
}

impl Launcher {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Spawn `<interpreter> <run file>` from the run file's own directory.
    pub fn run(&self, layout: &InstallLayout, name: &str, version: &str) -> Result<Child> {
        let run_file = layout.find_run_file(name, version).ok_or_else(|| {
            MailpackError::NotFound(format!(
                "Can not find the run file of project \"{}\".",
                layout.dir_name(name, version)
            ))
        })?;
        let run_file = run_file.canonicalize()?;
        let work_dir = run_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| layout.project_dir(name, version));

        log::info!("Starting {} {}", self.interpreter, run_file.display());
        Command::new(&self.interpreter)
            .arg(&run_file)
            .current_dir(&work_dir)
            .spawn()
            .map_err(|e| MailpackError::Launch {
                project: layout.dir_name(name, version),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_run_file() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("Demo-1.0")).unwrap();
        let layout = InstallLayout::new(root.path(), "-", "main.py");

        let err = Launcher::new("python").run(&layout, "Demo", "1.0").unwrap_err();
        assert!(matches!(err, MailpackError::NotFound(_)));
        assert!(err.to_string().contains("Demo-1.0"));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_run_file_directory() {
        let root = TempDir::new().unwrap();
        let app = root.path().join("Demo-1.0").join("app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("main.sh"), "pwd > where.txt\n").unwrap();
        let layout = InstallLayout::new(root.path(), "-", "main.sh");

        let mut child = Launcher::new("sh").run(&layout, "Demo", "1.0").unwrap();
        assert!(child.wait().unwrap().success());

        let written = fs::read_to_string(app.join("where.txt")).unwrap();
        assert_eq!(
            fs::canonicalize(written.trim()).unwrap(),
            app.canonicalize().unwrap()
        );
    }
}
