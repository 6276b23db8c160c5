//! Utilities (source file loading).

use std::fs;
use std::path::Path;
use anyhow::{bail, Result};

/// Languages the playground edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    Html,
    Css,
}

impl Language {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &["js", "mjs", "cjs"],
            Language::Html => &["html", "htm"],
            Language::Css => &["css"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
        }
    }
}

/// Read a source file for `language`.
/// Files without an extension are accepted for any language.
pub fn read_source(file_path: &str, language: Language) -> Result<String> {
    let path = Path::new(file_path);

    if !path.exists() {
        bail!("Source file '{}' does not exist", file_path);
    }

    if !path.is_file() {
        bail!("'{}' is not a file", file_path);
    }

    let extension = path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !extension.is_empty() && !language.extensions().contains(&extension.as_str()) {
        bail!(
            "Unsupported file type for {}: .{}\nExpected one of: .{}",
            language.name(),
            extension,
            language.extensions().join(", .")
        );
    }

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", file_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) -> String {
        let p = dir.join(name);
        fs::write(&p, text).unwrap();
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn test_reads_matching_extension() {
        let dir = tempfile::tempdir().unwrap();
        let js = write(dir.path(), "main.JS", "console.log(1)");
        assert_eq!(read_source(&js, Language::JavaScript).unwrap(), "console.log(1)");
        let css = write(dir.path(), "site.css", "body{}");
        assert_eq!(read_source(&css, Language::Css).unwrap(), "body{}");
    }

    #[test]
    fn test_rejects_mismatched_extension() {
        let dir = tempfile::tempdir().unwrap();
        let html = write(dir.path(), "index.html", "<p></p>");
        let err = read_source(&html, Language::JavaScript).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type for JavaScript"), "{}", err);
    }

    #[test]
    fn test_accepts_no_extension() {
        let dir = tempfile::tempdir().unwrap();
        let script = write(dir.path(), "script", "1 + 1");
        assert!(read_source(&script, Language::JavaScript).is_ok());
    }

    #[test]
    fn test_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_source("does/not/exist.js", Language::JavaScript).is_err());
        let err = read_source(&dir.path().to_string_lossy(), Language::Html).unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
