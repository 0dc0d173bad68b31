use crate::error::{PaperToolsError, Result};
use crate::services::discovery::{display_name, FileDiscovery};
use crate::services::manifest::SplitManifest;
use crate::types::{Half, SplitConfig, SplitFailure, SplitOutcome, SplitSummary};
use image::ImageReader;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Pixel rectangle as `(x, y, width, height)`.
pub type CropBox = (u32, u32, u32, u32);

pub struct ImageSplitter;

impl ImageSplitter {
    /// Left and right halves of a `width` x `height` image. The right half
    /// takes the extra column when the width is odd.
    pub fn half_boxes(width: u32, height: u32) -> [CropBox; 2] {
        let midpoint = width / 2;
        [(0, 0, midpoint, height), (midpoint, 0, width - midpoint, height)]
    }

    /// `<stem><A|B>.<ext>` next to `path`.
    pub fn half_path(path: &Path, half: Half) -> PathBuf {
        let mut name = path.file_stem().map(OsString::from).unwrap_or_default();
        name.push(half.suffix().to_string());
        if let Some(ext) = path.extension() {
            name.push(".");
            name.push(ext);
        }
        path.with_file_name(name)
    }

    /// Splits one image. The decoder is picked from the file contents, the
    /// encoder for each half from its extension.
    pub fn split_image(path: &Path) -> Result<SplitOutcome> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let (width, height) = (img.width(), img.height());

        if width < 2 {
            return Err(PaperToolsError::ImageTooNarrow { width });
        }

        let [left_box, right_box] = Self::half_boxes(width, height);
        let left = Self::half_path(path, Half::Left);
        let right = Self::half_path(path, Half::Right);

        let (x, y, w, h) = left_box;
        img.crop_imm(x, y, w, h).save(&left)?;
        let (x, y, w, h) = right_box;
        img.crop_imm(x, y, w, h).save(&right)?;

        Ok(SplitOutcome {
            source: path.to_path_buf(),
            left,
            right,
            width,
            height,
            left_width: left_box.2,
            right_width: right_box.2,
        })
    }

    /// Splits every eligible image in the configured directory. Failures are
    /// recorded per file and never stop the scan.
    ///
    /// Earlier halves are recognised by their `A`/`B` name suffix, or, when
    /// the manifest is enabled, only by being listed in it.
    pub async fn split_directory(config: &SplitConfig) -> Result<SplitSummary> {
        let candidates = FileDiscovery::find_images(&config.dir, !config.use_manifest)?;
        let mut summary = SplitSummary {
            skipped: candidates.skipped,
            ..SplitSummary::default()
        };

        let mut manifest = if config.use_manifest {
            Some(SplitManifest::load(&config.dir).await)
        } else {
            None
        };

        for path in candidates.eligible {
            let name = display_name(&path);

            if manifest.as_ref().is_some_and(|m| m.is_output(&path)) {
                info!("Skipping '{}' (listed as a split part in the manifest)", name);
                summary.skipped.push(path);
                continue;
            }

            if config.dry_run {
                info!("Would split '{}'", name);
                summary.planned.push(path);
                continue;
            }

            info!("Processing '{}'...", name);
            let source = path.clone();
            let result = tokio::task::spawn_blocking(move || Self::split_image(&source))
                .await
                .map_err(PaperToolsError::from)
                .and_then(|r| r);

            match result {
                Ok(outcome) => {
                    info!(
                        "  -> Successfully split into '{}' and '{}'",
                        display_name(&outcome.left),
                        display_name(&outcome.right)
                    );
                    if let Some(manifest) = manifest.as_mut() {
                        manifest.record(&outcome);
                    }
                    summary.split.push(outcome);
                }
                Err(e) => {
                    error!("  -> An error occurred while processing {}: {}", name, e);
                    summary.failed.push(SplitFailure {
                        source: path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if let Some(manifest) = manifest {
            if !summary.split.is_empty() {
                if let Err(e) = manifest.save(&config.dir).await {
                    warn!("Could not update split manifest: {}", e);
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_even_width_halves() {
        let [left, right] = ImageSplitter::half_boxes(100, 40);
        assert_eq!(left, (0, 0, 50, 40));
        assert_eq!(right, (50, 0, 50, 40));
    }

    #[test]
    fn test_odd_width_gives_right_extra_column() {
        let [left, right] = ImageSplitter::half_boxes(101, 7);
        assert_eq!(left, (0, 0, 50, 7));
        assert_eq!(right, (50, 0, 51, 7));
    }

    #[test]
    fn test_half_path_keeps_extension() {
        let path = Path::new("/scans/page.JPG");
        assert_eq!(
            ImageSplitter::half_path(path, Half::Left),
            PathBuf::from("/scans/pageA.JPG")
        );
        assert_eq!(
            ImageSplitter::half_path(path, Half::Right),
            PathBuf::from("/scans/pageB.JPG")
        );
    }

    #[test]
    fn test_split_image_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.png");
        let img = RgbImage::from_fn(5, 3, |x, _| Rgb([x as u8 * 40, 0, 0]));
        img.save(&path).unwrap();

        let outcome = ImageSplitter::split_image(&path).unwrap();
        assert_eq!((outcome.left_width, outcome.right_width), (2, 3));

        let left = image::open(&outcome.left).unwrap().to_rgb8();
        let right = image::open(&outcome.right).unwrap().to_rgb8();
        assert_eq!(left.dimensions(), (2, 3));
        assert_eq!(right.dimensions(), (3, 3));
        assert_eq!(left.get_pixel(1, 0), &Rgb([40, 0, 0]));
        assert_eq!(right.get_pixel(0, 2), &Rgb([80, 0, 0]));
        assert!(path.exists());
    }

    #[test]
    fn test_single_column_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.png");
        RgbImage::new(1, 8).save(&path).unwrap();

        let err = ImageSplitter::split_image(&path).unwrap_err();
        assert!(matches!(err, PaperToolsError::ImageTooNarrow { width: 1 }));
    }

    #[test]
    fn test_png_named_jpg_is_decoded_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("scan.png");
        RgbImage::from_pixel(6, 4, Rgb([200, 10, 10])).save(&png).unwrap();
        let path = dir.path().join("scan.jpg");
        std::fs::rename(&png, &path).unwrap();

        let outcome = ImageSplitter::split_image(&path).unwrap();
        assert_eq!((outcome.left_width, outcome.right_width), (3, 3));

        // Halves are written in the format their extension names.
        let left = std::fs::read(&outcome.left).unwrap();
        assert_eq!(image::guess_format(&left).unwrap(), image::ImageFormat::Jpeg);
        assert_eq!(image::open(&outcome.right).unwrap().height(), 4);
    }
}
