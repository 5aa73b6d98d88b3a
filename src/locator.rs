//! Locate the newest screenshot in a directory

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Error, Result, Stage};

/// A screenshot picked for renaming
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotFile {
    /// Absolute path to the file
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Size in bytes
    pub size: u64,
    /// Pixel dimensions, if the header could be read
    pub dimensions: Option<(u32, u32)>,
}

impl ScreenshotFile {
    /// Directory holding the screenshot; the converted file lands here too
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Modification time in local time, for logs and prompts
    pub fn modified_local(&self) -> String {
        chrono::DateTime::<chrono::Local>::from(self.modified)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Filename filter: `<prefix>*.<extension>`
#[derive(Debug, Clone)]
pub struct Locator {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl Locator {
    pub fn new(dir: PathBuf, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir,
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Glob-style pattern for messages
    pub fn pattern(&self) -> String {
        format!("{}*.{}", self.prefix, self.extension)
    }

    pub fn matches(&self, name: &str) -> bool {
        if !name.starts_with(&self.prefix) {
            return false;
        }
        let suffix = format!(".{}", self.extension);
        name.len() >= self.prefix.len() + suffix.len()
            && name
                .get(name.len() - suffix.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix))
    }

    /// Return the matching regular file with the latest modification time.
    ///
    /// Equal mtimes fall back to the lexically greater name.
    pub fn newest(&self) -> Result<ScreenshotFile> {
        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| Error::io(Stage::Locate, &self.dir, e))?;

        let mut newest: Option<(SystemTime, String, PathBuf, u64)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(Stage::Locate, &self.dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.matches(&name) {
                continue;
            }

            // Follows symlinks, so a link to a regular file counts
            let path = entry.path();
            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .map_err(|e| Error::io(Stage::Locate, &path, e))?;
            log::debug!("Candidate screenshot {}", path.display());

            let is_newer = match &newest {
                Some((best_time, best_name, ..)) => {
                    (modified, name.as_str()) > (*best_time, best_name.as_str())
                }
                None => true,
            };
            if is_newer {
                newest = Some((modified, name, path, metadata.len()));
            }
        }

        let (modified, _, path, size) = newest.ok_or_else(|| Error::NotFound {
            dir: self.dir.clone(),
            pattern: self.pattern(),
        })?;
        let path = std::path::absolute(&path).map_err(|e| Error::io(Stage::Locate, &path, e))?;
        let dimensions = match image::image_dimensions(&path) {
            Ok(dimensions) => Some(dimensions),
            Err(e) => {
                log::debug!("Could not read dimensions of {}: {}", path.display(), e);
                None
            }
        };

        let file = ScreenshotFile {
            path,
            modified,
            size,
            dimensions,
        };
        log::info!(
            "Newest screenshot: {} (modified {}, {} bytes)",
            file.path.display(),
            file.modified_local(),
            file.size
        );
        Ok(file)
    }
}
