use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use chromids::export::{export_document, CsvLayout};
use chromids::ids::IdsDocument;

/// File stem for exports: `run.ids.json` -> `run`
fn export_base(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = name
        .strip_suffix(".ids.json")
        .or_else(|| name.strip_suffix(".json"))
        .unwrap_or(&name);
    if base.is_empty() {
        "export".to_string()
    } else {
        base.to_string()
    }
}

/// Write CSV files for one IDS document
pub fn run(file: PathBuf, layout: CsvLayout, output_dir: Option<PathBuf>) -> Result<()> {
    let doc = IdsDocument::from_file(&file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let output_dir = output_dir.unwrap_or_else(|| {
        file.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let written = export_document(&doc, &output_dir, &export_base(&file), layout)
        .context("Export failed")?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
