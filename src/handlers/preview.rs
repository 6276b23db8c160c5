//! Preview handler: compose HTML + CSS into one document.

use std::path::Path;

use anyhow::Result;

use crate::{
    config::Config,
    preview::write_document,
    utils::{read_source, Language},
};

pub fn run(cfg: &Config, html_file: &str, css_file: Option<&str>, out: Option<&str>) -> Result<()> {
    let html = read_source(html_file, Language::Html)?;
    let css = match css_file {
        Some(f) => read_source(f, Language::Css)?,
        None => String::new(),
    };
    let path = write_document(&html, &css, out.map(Path::new), &cfg.preview_dir())?;
    tracing::info!(path = %path.display(), "preview written");
    println!("{}", path.display());
    Ok(())
}
