//! Template Loader - load prompt templates from files
//!
//! Templates are re-read from disk on every call. There is no cache at this
//! layer; a caller that needs one adds it as its own concern.

use std::path::{Path, PathBuf};

use crate::error::{PromptrError, Result};

/// Loads prompt templates from a directory
pub struct TemplateLoader {
    /// Base directory containing prompt template files
    templates_dir: PathBuf,
}

impl TemplateLoader {
    /// Create a new TemplateLoader with the given templates directory
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        Self {
            templates_dir: templates_dir.as_ref().to_path_buf(),
        }
    }

    /// Load a template from disk
    ///
    /// # Arguments
    /// * `name` - The template name (without .md extension)
    ///
    /// # Returns
    /// The template content as a string
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.template_path(name);
        if !path.exists() {
            return Err(PromptrError::TemplateNotFound(name.to_string()));
        }

        std::fs::read_to_string(&path).map_err(|e| {
            PromptrError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to load template '{}' from {:?}: {}", name, path, e),
            ))
        })
    }

    /// Check if a template exists on disk
    pub fn exists(&self, name: &str) -> bool {
        self.template_path(name).exists()
    }

    /// Get the full path for a template by name
    fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(format!("{}.md", name))
    }

    /// List all available templates in the directory
    pub fn list_available(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.templates_dir).map_err(|e| {
            PromptrError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to read templates directory {:?}: {}",
                    self.templates_dir, e
                ),
            ))
        })?;

        let mut templates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md")
                && let Some(stem) = path.file_stem()
                && let Some(name) = stem.to_str()
            {
                templates.push(name.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }

    /// Get the templates directory path
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_loader() -> (TemplateLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let loader = TemplateLoader::new(temp_dir.path());
        (loader, temp_dir)
    }

    fn write_template(temp_dir: &TempDir, name: &str, content: &str) {
        let path = temp_dir.path().join(format!("{}.md", name));
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_new_loader() {
        let (loader, temp_dir) = create_test_loader();
        assert_eq!(loader.templates_dir(), temp_dir.path());
    }

    #[test]
    fn test_load_template() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "test", "Describe: {user_description}");

        let content = loader.load("test").unwrap();
        assert_eq!(content, "Describe: {user_description}");
    }

    #[test]
    fn test_load_rereads_from_disk() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "test", "Original content");

        let content1 = loader.load("test").unwrap();
        assert_eq!(content1, "Original content");

        // Modify file on disk
        write_template(&temp_dir, "test", "Modified content");

        // Second load sees the new content (no cache at this layer)
        let content2 = loader.load("test").unwrap();
        assert_eq!(content2, "Modified content");
    }

    #[test]
    fn test_load_nonexistent() {
        let (loader, _temp_dir) = create_test_loader();
        let result = loader.load("nonexistent");
        assert!(matches!(result, Err(PromptrError::TemplateNotFound(_))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Template not found: nonexistent"
        );
    }

    #[test]
    fn test_exists() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "exists", "content");

        assert!(loader.exists("exists"));
        assert!(!loader.exists("nonexistent"));
    }

    #[test]
    fn test_list_available() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "resume_prompt", "resume template");
        write_template(&temp_dir, "cover_letter", "cover letter template");
        write_template(&temp_dir, "summary", "summary template");

        let available = loader.list_available().unwrap();
        assert_eq!(available, vec!["cover_letter", "resume_prompt", "summary"]);
    }

    #[test]
    fn test_list_available_empty() {
        let (loader, _temp_dir) = create_test_loader();
        let available = loader.list_available().unwrap();
        assert!(available.is_empty());
    }

    #[test]
    fn test_list_available_ignores_non_md_files() {
        let (loader, temp_dir) = create_test_loader();
        write_template(&temp_dir, "valid", "content");
        fs::write(temp_dir.path().join("ignore.txt"), "not a template").unwrap();
        fs::write(temp_dir.path().join("ignore.json"), "{}").unwrap();

        let available = loader.list_available().unwrap();
        assert_eq!(available, vec!["valid"]);
    }

    #[test]
    fn test_list_available_missing_dir() {
        let loader = TemplateLoader::new("/nonexistent/templates");
        assert!(loader.list_available().is_err());
    }

    #[test]
    fn test_template_path() {
        let (loader, temp_dir) = create_test_loader();
        let expected = temp_dir.path().join("mytemplate.md");
        assert_eq!(loader.template_path("mytemplate"), expected);
    }
}
