use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

/// Rendered source text keyed by its path relative to an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Path relative to the output directory (`com/example/Greeter.java`).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file below `base`, creating parent directories.
    pub fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = base.join(&self.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
        }
        std::fs::write(&path, &self.content)
            .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = SourceFile::new("com/example/Greeter.java", "class Greeter {}\n");
        let written = file.write(dir.path()).unwrap();

        assert_eq!(written, dir.path().join("com/example/Greeter.java"));
        assert_eq!(
            std::fs::read_to_string(written).unwrap(),
            "class Greeter {}\n"
        );
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        SourceFile::new("A.java", "old").write(dir.path()).unwrap();
        SourceFile::new("A.java", "new").write(dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("A.java")).unwrap(),
            "new"
        );
    }
}
