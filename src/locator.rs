use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Resolves the documents a run should process.
///
/// Explicitly named files are returned as given, in order; whether they exist
/// is checked later, per document. With no explicit files, every file under
/// `root` matching one of `patterns` is returned, de-duplicated and sorted.
///
/// # Errors
///
/// Returns an error if a pattern is invalid, or if discovery finds no
/// documents at all.
pub fn locate_documents(files: &[PathBuf], root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }

    let documents = discover(root, patterns)?;
    if documents.is_empty() {
        anyhow::bail!("no documentation files found in {}", root.display());
    }

    log::info!(
        "Discovered {} documentation file(s) under {}",
        documents.len(),
        root.display()
    );
    Ok(documents)
}

fn discover(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let mut documents = Vec::new();

    for pattern in patterns {
        let full_pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
        let paths = glob::glob(&full_pattern)
            .with_context(|| format!("Invalid discovery pattern '{}'", pattern))?;

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => documents.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable path during discovery: {}", e),
            }
        }
    }

    documents.sort();
    documents.dedup();
    Ok(documents)
}
