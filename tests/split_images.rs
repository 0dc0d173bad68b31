use image::{GenericImageView, Rgb, RgbImage};
use paper_tools::{ImageSplitter, SplitConfig, SplitManifest};
use std::path::Path;

fn write_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([10, 20, 30]))
        .save(path)
        .unwrap();
}

#[tokio::test]
async fn test_splits_each_image_into_halves() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("even.png"), 100, 20);
    write_image(&dir.path().join("odd.bmp"), 33, 9);

    let summary = ImageSplitter::split_directory(&SplitConfig::for_dir(dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.split.len(), 2);
    assert!(summary.failed.is_empty());

    assert_eq!(image::open(dir.path().join("evenA.png")).unwrap().dimensions(), (50, 20));
    assert_eq!(image::open(dir.path().join("evenB.png")).unwrap().dimensions(), (50, 20));
    assert_eq!(image::open(dir.path().join("oddA.bmp")).unwrap().dimensions(), (16, 9));
    assert_eq!(image::open(dir.path().join("oddB.bmp")).unwrap().dimensions(), (17, 9));
}

#[tokio::test]
async fn test_previous_halves_are_not_split_again() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("photo.png"), 40, 10);

    let config = SplitConfig::for_dir(dir.path());
    ImageSplitter::split_directory(&config).await.unwrap();
    let second = ImageSplitter::split_directory(&config).await.unwrap();

    assert_eq!(second.split.len(), 1);
    assert_eq!(second.skipped.len(), 2);
    assert!(!dir.path().join("photoAA.png").exists());
    assert!(!dir.path().join("photoAB.png").exists());
}

#[tokio::test]
async fn test_corrupt_file_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("first.png"), 10, 10);
    std::fs::write(dir.path().join("middle.jpg"), b"not really a jpeg").unwrap();
    write_image(&dir.path().join("zlast.tiff"), 12, 6);

    let summary = ImageSplitter::split_directory(&SplitConfig::for_dir(dir.path()))
        .await
        .unwrap();

    assert_eq!(summary.split.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.processed_count(), 3);
    assert_eq!(summary.failed[0].source, dir.path().join("middle.jpg"));
    assert!(dir.path().join("zlastA.tiff").exists());
    assert!(dir.path().join("zlastB.tiff").exists());
    assert!(!dir.path().join("middleA.jpg").exists());
}

#[tokio::test]
async fn test_empty_directory_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"hello").unwrap();

    let summary = ImageSplitter::split_directory(&SplitConfig::for_dir(dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.processed_count(), 0);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("scan.png"), 8, 8);

    let config = SplitConfig {
        dry_run: true,
        ..SplitConfig::for_dir(dir.path())
    };
    let summary = ImageSplitter::split_directory(&config).await.unwrap();

    assert_eq!(summary.planned.len(), 1);
    assert!(summary.split.is_empty());
    assert!(!dir.path().join("scanA.png").exists());
}

#[tokio::test]
async fn test_name_guard_skips_names_ending_in_a() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("tuba.png"), 8, 8);

    let summary = ImageSplitter::split_directory(&SplitConfig::for_dir(dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.processed_count(), 0);
    assert_eq!(summary.skipped.len(), 1);
}

#[tokio::test]
async fn test_manifest_guard_uses_recorded_outputs() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("tuba.png"), 8, 8);

    let config = SplitConfig {
        use_manifest: true,
        ..SplitConfig::for_dir(dir.path())
    };
    let first = ImageSplitter::split_directory(&config).await.unwrap();
    assert_eq!(first.split.len(), 1);
    assert!(dir.path().join("tubaA.png").exists());
    assert!(SplitManifest::path_in(dir.path()).exists());

    let manifest = SplitManifest::load(dir.path()).await;
    assert_eq!(manifest.entries.len(), 1);
    assert_eq!(manifest.entries[0].outputs, vec!["tubaA.png", "tubaB.png"]);

    let second = ImageSplitter::split_directory(&config).await.unwrap();
    assert_eq!(second.split.len(), 1);
    assert_eq!(second.skipped.len(), 2);
    assert!(!dir.path().join("tubaAA.png").exists());
}

#[tokio::test]
async fn test_misnamed_png_is_split() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("scan.png"), 10, 4);
    std::fs::rename(dir.path().join("scan.png"), dir.path().join("scan.jpg")).unwrap();

    let summary = ImageSplitter::split_directory(&SplitConfig::for_dir(dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.split.len(), 1);
    assert!(summary.failed.is_empty());
    assert_eq!(image::open(dir.path().join("scanA.jpg")).unwrap().dimensions(), (5, 4));
}
