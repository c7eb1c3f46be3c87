//! Deterministic file naming for one archive's outputs.
//!
//! ```text
//! <output_root>/<base>/
//!     raw_files/               unpacked archive entries
//!     <base>_extracted.json    intermediate model
//!     <base>_summary.json      intermediate model without bulk arrays
//!     <base>.ids.json          IDS document
//!     <base>.csv ...           CSV export
//! ```

use std::path::{Path, PathBuf};

const EXTRACTED_SUFFIX: &str = "_extracted.json";
const SUMMARY_SUFFIX: &str = "_summary.json";
const IDS_SUFFIX: &str = ".ids.json";

/// Output locations derived from an archive's base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    dir: PathBuf,
    base: String,
}

impl ArchiveLayout {
    /// Layout for `archive` under `output_root`; the base name is the file stem
    pub fn for_archive(archive: &Path, output_root: &Path) -> Self {
        let base = base_name(archive);
        Self {
            dir: output_root.join(&base),
            base,
        }
    }

    /// Layout for an existing `<base>_extracted.json` file; the directory is
    /// the file's parent
    pub fn from_extracted(extracted: &Path) -> Option<Self> {
        let file_name = extracted.file_name()?.to_str()?;
        let base = file_name.strip_suffix(EXTRACTED_SUFFIX)?;
        if base.is_empty() {
            return None;
        }
        Some(Self {
            dir: extracted.parent().map(Path::to_path_buf).unwrap_or_default(),
            base: base.to_string(),
        })
    }

    /// Base name shared by every output file
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Per-archive output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn raw_files_dir(&self) -> PathBuf {
        self.dir.join("raw_files")
    }

    pub fn extracted_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.base, EXTRACTED_SUFFIX))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.base, SUMMARY_SUFFIX))
    }

    pub fn ids_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.base, IDS_SUFFIX))
    }
}

/// File stem of `path`, or the whole file name when there is no stem
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_archive() {
        let layout = ArchiveLayout::for_archive(Path::new("data/akta/Sample 1.zip"), Path::new("out"));

        assert_eq!(layout.base(), "Sample 1");
        assert_eq!(layout.dir(), Path::new("out/Sample 1"));
        assert_eq!(layout.raw_files_dir(), Path::new("out/Sample 1/raw_files"));
        assert_eq!(
            layout.extracted_path(),
            Path::new("out/Sample 1/Sample 1_extracted.json")
        );
        assert_eq!(layout.summary_path(), Path::new("out/Sample 1/Sample 1_summary.json"));
        assert_eq!(layout.ids_path(), Path::new("out/Sample 1/Sample 1.ids.json"));
    }

    #[test]
    fn test_layout_from_extracted() {
        let layout = ArchiveLayout::from_extracted(Path::new("out/run/run_extracted.json")).unwrap();
        assert_eq!(layout.base(), "run");
        assert_eq!(layout.ids_path(), Path::new("out/run/run.ids.json"));

        assert!(ArchiveLayout::from_extracted(Path::new("out/run/run_summary.json")).is_none());
        assert!(ArchiveLayout::from_extracted(Path::new("out/_extracted.json")).is_none());
    }
}
