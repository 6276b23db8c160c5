//! HTML + CSS preview documents. Nothing is executed here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Embed `css` in the head and `html` in the body, verbatim.
pub fn compose_document(html: &str, css: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <style>{css}</style>\n  </head>\n  <body>{html}</body>\n</html>\n"
    )
}

/// Write the composed document to `out`, or to a fresh file in `dir`.
pub fn write_document(html: &str, css: &str, out: Option<&Path>, dir: &Path) -> Result<PathBuf> {
    let doc = compose_document(html, css);
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, doc).with_context(|| format!("failed to write {}", path.display()))?;
            Ok(path.to_path_buf())
        }
        None => {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
            let file = tempfile::Builder::new()
                .prefix("preview-")
                .suffix(".html")
                .tempfile_in(dir)
                .context("failed to create preview file")?;
            fs::write(file.path(), doc)
                .with_context(|| format!("failed to write {}", file.path().display()))?;
            let (_, path) = file.keep().context("failed to keep preview file")?;
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_embeds_both_parts() {
        let doc = compose_document("<h1>Hi</h1>", "h1 { color: red; }");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<style>h1 { color: red; }</style>"));
        assert!(doc.contains("<body><h1>Hi</h1></body>"));
        assert!(doc.find("<style>").unwrap() < doc.find("<body>").unwrap());
    }

    #[test]
    fn test_compose_does_not_escape() {
        let doc = compose_document("<script>alert(1)</script>", "");
        assert!(doc.contains("<body><script>alert(1)</script></body>"));
        assert!(doc.contains("<style></style>"));
    }

    #[test]
    fn test_write_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("page.html");
        let written = write_document("<p>x</p>", "p{}", Some(&out), dir.path()).unwrap();
        assert_eq!(written, out);
        let text = fs::read_to_string(out).unwrap();
        assert!(text.contains("<body><p>x</p></body>"));
    }

    #[test]
    fn test_write_to_generated_path() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_document("<p>y</p>", "", None, &dir.path().join("previews")).unwrap();
        assert!(written.starts_with(dir.path()));
        assert_eq!(written.extension().and_then(|e| e.to_str()), Some("html"));
        assert!(fs::read_to_string(written).unwrap().contains("<p>y</p>"));
    }
}
