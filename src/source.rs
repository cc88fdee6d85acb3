//! Template sources: where top-level templates and includes come from

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Supplies template content by name
pub trait TemplateSource {
    /// Content for `name`, or `None` when there is no such template
    fn fetch(&self, name: &str) -> Option<String>;

    /// Human-readable location of `name`, used in error messages
    fn locate(&self, name: &str) -> String {
        name.to_string()
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn fetch(&self, name: &str) -> Option<String> {
        (**self).fetch(name)
    }

    fn locate(&self, name: &str) -> String {
        (**self).locate(name)
    }
}

/// Templates stored as `<dir>/<name>.<ext>` files
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    ext: String,
}

impl FileSource {
    /// Create a source rooted at `dir`, reading files with extension `ext`
    ///
    /// A leading `.` on the extension is ignored.
    pub fn new(dir: impl AsRef<Path>, ext: &str) -> Result<Self, EngineError> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(EngineError::MissingDirectory);
        }
        if !dir.is_dir() {
            return Err(EngineError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            ext: ext.trim_start_matches('.').to_string(),
        })
    }

    /// Path the template `name` is read from
    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.ext.is_empty() {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{}.{}", name, self.ext))
        }
    }
}

impl TemplateSource for FileSource {
    fn fetch(&self, name: &str) -> Option<String> {
        let path = self.path_for(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read template");
                None
            }
        }
    }

    fn locate(&self, name: &str) -> String {
        self.path_for(name).display().to_string()
    }
}

/// Templates held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    templates: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template
    pub fn with_template(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    /// Add or replace a template
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.templates.insert(name.into(), content.into());
    }
}

impl TemplateSource for MemorySource {
    fn fetch(&self, name: &str) -> Option<String> {
        self.templates.get(name).cloned()
    }
}
