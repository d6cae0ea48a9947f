//! 画像の受け付け
//!
//! ラベル画像を検証し、OCR用に一時ディレクトリへ複製する。
//! 一時ディレクトリは StagedImage の破棄時に削除される。

use crate::error::{LabelScanError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageInfo {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path: path.to_path_buf(), file_name }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| is_image_extension(&e.to_string_lossy()))
        .unwrap_or(false)
}

/// ファイルならその1枚、フォルダなら直下の画像を返す
pub fn collect_images(path: &Path) -> Result<Vec<ImageInfo>> {
    if !path.exists() {
        return Err(LabelScanError::FileNotFound(path.display().to_string()));
    }

    if path.is_dir() {
        return scan_folder(path);
    }

    if !has_image_extension(path) {
        return Err(LabelScanError::UnsupportedImage(path.display().to_string()));
    }

    Ok(vec![ImageInfo::from_path(path)])
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(LabelScanError::FileNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && has_image_extension(e.path()))
        .map(|e| ImageInfo::from_path(e.path()))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// OCR用に複製した画像
pub struct StagedImage {
    dir: TempDir,
    path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// 画像をデコードして検証し、一時ディレクトリへPNGで書き出す
///
/// PNGに統一するのでOCRエンジン側は入力形式を気にしなくてよい。
pub fn stage_image(image: &ImageInfo) -> Result<StagedImage> {
    if !has_image_extension(&image.path) {
        return Err(LabelScanError::UnsupportedImage(image.file_name.clone()));
    }

    let decoded = image::open(&image.path)
        .map_err(|e| LabelScanError::ImageLoad(format!("{}: {}", image.file_name, e)))?;

    let dir = tempfile::Builder::new().prefix("label-scan-").tempdir()?;
    let stem = image
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "label".to_string());
    let path = dir.path().join(format!("{}.png", stem));

    decoded
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| LabelScanError::ImageLoad(format!("一時ファイル書き込み失敗: {}", e)))?;

    debug!("staged {} -> {}", image.path.display(), path.display());

    Ok(StagedImage {
        dir,
        path,
        width: decoded.width(),
        height: decoded.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    fn write_png(path: &Path) {
        let img = image::RgbImage::from_pixel(4, 3, image::Rgb([255, 255, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("Png"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("gif"));
    }

    #[test]
    fn test_collect_images_not_found() {
        let result = collect_images(Path::new("/nonexistent/label.png"));
        assert!(matches!(result, Err(LabelScanError::FileNotFound(_))));
    }

    #[test]
    fn test_collect_images_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.gif");
        File::create(&path).unwrap().write_all(b"GIF89a").unwrap();

        let result = collect_images(&path);
        assert!(matches!(result, Err(LabelScanError::UnsupportedImage(_))));
    }

    #[test]
    fn test_scan_folder_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("c.jpg")).unwrap();
        File::create(dir.path().join("a.PNG")).unwrap();
        File::create(dir.path().join("b.jpeg")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("d.jpg")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpeg", "c.jpg"]);
    }

    #[test]
    fn test_stage_image_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("label.png");
        write_png(&src);

        let staged = stage_image(&ImageInfo::from_path(&src)).unwrap();
        let staged_path = staged.path().to_path_buf();
        let staged_dir = staged.dir().to_path_buf();
        assert!(staged_path.exists());
        assert_eq!((staged.width, staged.height), (4, 3));

        drop(staged);
        assert!(!staged_path.exists());
        assert!(!staged_dir.exists());
    }

    #[test]
    fn test_stage_image_undecodable() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("broken.jpg");
        File::create(&src).unwrap().write_all(b"not an image").unwrap();

        let result = stage_image(&ImageInfo::from_path(&src));
        assert!(matches!(result, Err(LabelScanError::ImageLoad(_))));
    }
}
