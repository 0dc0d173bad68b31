use crate::error::{PaperToolsError, Result};
use crate::types::IMAGE_EXTENSIONS;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Lists and filters the files a run operates on. Only the top level of the
/// working directory is considered.
pub struct FileDiscovery;

/// Images found in a directory, split by whether the name guard let them through.
#[derive(Debug, Default)]
pub struct ImageCandidates {
    pub eligible: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl FileDiscovery {
    pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PaperToolsError::Scan {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} files in {}", files.len(), dir.display());
        Ok(files)
    }

    pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(Self::list_files(dir)?
            .into_iter()
            .filter(|p| Self::has_extension(p, &["pdf"]))
            .collect())
    }

    /// Returns the only PDF in `dir`, or a cardinality error when there are
    /// none or several.
    pub fn find_single_pdf(dir: &Path) -> Result<PathBuf> {
        let mut pdfs = Self::find_pdfs(dir)?;

        if pdfs.len() != 1 {
            return Err(PaperToolsError::InputCardinality { found: pdfs.len() });
        }

        Ok(pdfs.remove(0))
    }

    /// True when the file stem ends in `A` or `B`, i.e. it looks like a half
    /// produced by an earlier split.
    pub fn is_split_output(path: &Path) -> bool {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.chars().last())
            .map(|c| matches!(c.to_ascii_uppercase(), 'A' | 'B'))
            .unwrap_or(false)
    }

    /// Image files in `dir`. With `name_guard` set, files that look like
    /// earlier split halves are moved to `skipped`.
    pub fn find_images(dir: &Path, name_guard: bool) -> Result<ImageCandidates> {
        let mut candidates = ImageCandidates::default();

        for path in Self::list_files(dir)? {
            if !Self::has_extension(&path, &IMAGE_EXTENSIONS) {
                continue;
            }

            if name_guard && Self::is_split_output(&path) {
                info!("Skipping '{}' (already a split part)", display_name(&path));
                candidates.skipped.push(path);
            } else {
                candidates.eligible.push(path);
            }
        }

        Ok(candidates)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(FileDiscovery::has_extension(Path::new("scan.PNG"), &IMAGE_EXTENSIONS));
        assert!(FileDiscovery::has_extension(Path::new("scan.Jpeg"), &IMAGE_EXTENSIONS));
        assert!(!FileDiscovery::has_extension(Path::new("scan.gif"), &IMAGE_EXTENSIONS));
        assert!(!FileDiscovery::has_extension(Path::new("README"), &IMAGE_EXTENSIONS));
    }

    #[test]
    fn test_split_output_detection() {
        assert!(FileDiscovery::is_split_output(Path::new("photoA.png")));
        assert!(FileDiscovery::is_split_output(Path::new("photob.jpg")));
        assert!(!FileDiscovery::is_split_output(Path::new("photo.png")));
        assert!(!FileDiscovery::is_split_output(Path::new("A/photo.png")));
    }

    #[test]
    fn test_single_pdf_cardinality() {
        let dir = tempfile::tempdir().unwrap();

        let err = FileDiscovery::find_single_pdf(dir.path()).unwrap_err();
        assert!(matches!(err, PaperToolsError::InputCardinality { found: 0 }));

        fs::write(dir.path().join("one.pdf"), b"%PDF-1.5").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        let found = FileDiscovery::find_single_pdf(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "one.pdf");

        fs::write(dir.path().join("two.PDF"), b"%PDF-1.5").unwrap();
        let err = FileDiscovery::find_single_pdf(dir.path()).unwrap_err();
        assert!(matches!(err, PaperToolsError::InputCardinality { found: 2 }));
    }

    #[test]
    fn test_find_images_filters_and_guards() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "right.png",
            "left.jpg",
            "photoA.png",
            "photoB.tiff",
            "doc.pdf",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let candidates = FileDiscovery::find_images(dir.path(), true).unwrap();
        let eligible: Vec<_> = candidates
            .eligible
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(eligible, vec!["left.jpg", "right.png"]);
        let skipped: Vec<_> = candidates
            .skipped
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(skipped, vec!["photoA.png", "photoB.tiff"]);

        let unguarded = FileDiscovery::find_images(dir.path(), false).unwrap();
        assert_eq!(unguarded.eligible.len(), 4);
        assert!(unguarded.skipped.is_empty());
    }

    #[test]
    fn test_missing_directory_is_scan_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = FileDiscovery::list_files(&missing).unwrap_err();
        assert!(matches!(err, PaperToolsError::Scan { .. }));
    }
}
