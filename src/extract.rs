//! Extraction: one archive in, one populated output directory out.
//!
//! For each archive the raw entries are unpacked into `raw_files/`, the
//! decoder produces the intermediate model, and the model plus its summary
//! are written next to it (see [`crate::layout`]).

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use zip::ZipArchive;

use crate::config::FileSelection;
use crate::decoder::{is_zip_file, ArchiveDecoder, DecodeError};
use crate::layout::ArchiveLayout;
use crate::model::ModelError;

/// Errors extracting one archive
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The decoder rejected the archive
    #[error(transparent)]
    DecodeError(#[from] DecodeError),

    /// ZIP error while unpacking raw files
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The decoded model could not be serialized
    #[error("Model error: {0}")]
    ModelError(#[from] ModelError),
}

/// What one extraction produced
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// Where everything was written
    pub layout: ArchiveLayout,
    /// Entries unpacked into `raw_files/`
    pub raw_files: usize,
    /// Curves in the decoded model
    pub curves: usize,
    /// Event entries in the decoded model
    pub events: usize,
}

/// Input archives in `data_dir` according to `selection`, sorted by name.
///
/// Named files that do not exist are logged and skipped.
pub fn select_inputs(
    data_dir: &Path,
    selection: &FileSelection,
    extension: &str,
) -> io::Result<Vec<PathBuf>> {
    let mut files = match selection {
        FileSelection::Nothing => Vec::new(),
        FileSelection::All => {
            if !data_dir.is_dir() {
                warn!("Data directory {} does not exist", data_dir.display());
                return Ok(Vec::new());
            }
            let mut files = Vec::new();
            for entry in fs::read_dir(data_dir)? {
                let path = entry?.path();
                let matches = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
                if path.is_file() && matches {
                    files.push(path);
                }
            }
            files
        }
        FileSelection::Named(names) => names
            .iter()
            .filter_map(|name| {
                let path = data_dir.join(name);
                if path.is_file() {
                    Some(path)
                } else {
                    warn!("Selected file {} not found, skipping", path.display());
                    None
                }
            })
            .collect(),
    };

    files.sort();
    Ok(files)
}

/// Extract one archive under `output_root`
pub fn extract_archive(
    archive: &Path,
    output_root: &Path,
    decoder: &dyn ArchiveDecoder,
) -> Result<ExtractOutcome, ExtractError> {
    let layout = ArchiveLayout::for_archive(archive, output_root);
    let raw_dir = layout.raw_files_dir();
    fs::create_dir_all(&raw_dir)?;

    let raw_files = if is_zip_file(archive) {
        unpack_zip(archive, &raw_dir)?
    } else {
        let file_name = archive.file_name().unwrap_or(archive.as_os_str());
        fs::copy(archive, raw_dir.join(file_name))?;
        1
    };
    debug!("Unpacked {} raw file(s) to {}", raw_files, raw_dir.display());

    let mut model = decoder.decode(archive)?;
    model.metadata.raw_files_count = Some(raw_files);
    if model.metadata.decoder.is_none() {
        model.metadata.decoder = Some(decoder.name().to_string());
        model.metadata.decoder_version = decoder.version().map(str::to_string);
    }

    fs::write(layout.extracted_path(), model.to_json()?)?;
    write_json(&layout.summary_path(), &model.summary())?;

    info!(
        "Extracted {}: {} curves, {} events, {} raw files",
        archive.display(),
        model.curve_count(),
        model.event_count(),
        raw_files
    );

    Ok(ExtractOutcome {
        curves: model.curve_count(),
        events: model.event_count(),
        layout,
        raw_files,
    })
}

/// Unpack every file entry; entries escaping the target directory are skipped
fn unpack_zip(archive: &Path, target: &Path) -> Result<usize, ExtractError> {
    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    let mut count = 0;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let out_path = target.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(&out_path)?);
        io::copy(&mut entry, &mut out)?;
        count += 1;
    }

    Ok(count)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExtractError> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;
    use crate::decoder::JsonModelDecoder;
    use crate::model::IntermediateModel;

    const MODEL: &str = r#"{
        "metadata": {"source_file": "run.zip", "extraction_timestamp": "2024-05-01T10:00:00"},
        "curves": [{"id": "UV 1_280", "label": "UV 1_280", "data_type": "UV", "unit": "mAU",
                    "data": [[0.0, 0.01], [1.0, 0.02]]}],
        "events": [{"id": "Log", "label": "Logbook", "data": [[0.5, "start"]]}]
    }"#;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_zip_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("run.zip");
        write_zip(&archive, &[("Chrom.1.Xml", "<xml/>"), ("model.json", MODEL)]);

        let out = dir.path().join("out");
        let outcome = extract_archive(&archive, &out, &JsonModelDecoder).unwrap();

        assert_eq!(outcome.raw_files, 2);
        assert_eq!(outcome.curves, 1);
        assert_eq!(outcome.events, 1);
        assert!(out.join("run/raw_files/Chrom.1.Xml").is_file());

        let model = IntermediateModel::from_file(&outcome.layout.extracted_path()).unwrap();
        assert_eq!(model.metadata.raw_files_count, Some(2));
        assert_eq!(model.metadata.decoder.as_deref(), Some("chromids-json"));

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(outcome.layout.summary_path()).unwrap())
                .unwrap();
        assert_eq!(summary["curves"][0]["data_points"], 2);
        assert!(summary["curves"][0].get("data").is_none());
    }

    #[test]
    fn test_extract_plain_json_input() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("run.json");
        fs::write(&archive, MODEL).unwrap();

        let outcome = extract_archive(&archive, &dir.path().join("out"), &JsonModelDecoder).unwrap();
        assert_eq!(outcome.raw_files, 1);
        assert!(outcome.layout.raw_files_dir().join("run.json").is_file());
    }

    #[test]
    fn test_decode_error_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        write_zip(&archive, &[("readme.txt", "no model here")]);

        let err = extract_archive(&archive, &dir.path().join("out"), &JsonModelDecoder).unwrap_err();
        match err {
            ExtractError::DecodeError(e) => {
                assert_eq!(e.message, "archive contains no .json entry");
            }
            other => panic!("expected DecodeError, got {other:?}"),
        }
    }

    #[test]
    fn test_select_inputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.zip", "a.ZIP", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let all = select_inputs(dir.path(), &FileSelection::All, "zip").unwrap();
        assert_eq!(all, vec![dir.path().join("a.ZIP"), dir.path().join("b.zip")]);

        let none = select_inputs(dir.path(), &FileSelection::Nothing, "zip").unwrap();
        assert!(none.is_empty());

        let named = FileSelection::Named(vec!["b.zip".to_string(), "missing.zip".to_string()]);
        let some = select_inputs(dir.path(), &named, "zip").unwrap();
        assert_eq!(some, vec![dir.path().join("b.zip")]);

        let absent = select_inputs(&dir.path().join("nope"), &FileSelection::All, "zip").unwrap();
        assert!(absent.is_empty());
    }
}
