//! Pasted image persistence
//!
//! Every image pasted into (or attached to) the dialog is written as PNG into
//! a dedicated images directory. Files are never cleaned up here: the tool
//! handler reads them after the dialog has exited.

use chrono::{DateTime, Local};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{FeedbackError, Result};

/// Directory name used next to the dialog executable
pub const IMAGES_DIR_NAME: &str = "images";

/// Extensions accepted by the "attach image" picker
pub const IMPORTABLE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Raw RGBA bitmap taken from the clipboard
#[derive(Debug, Clone)]
pub struct PastedImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PastedImage {
    /// Read an image from the system clipboard.
    ///
    /// Returns `Ok(None)` when the clipboard holds no image.
    pub fn from_clipboard() -> Result<Option<Self>> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| FeedbackError::Clipboard(e.to_string()))?;
        match clipboard.get_image() {
            Ok(img) => Ok(Some(Self {
                width: img.width,
                height: img.height,
                rgba: img.bytes.into_owned(),
            })),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(FeedbackError::Clipboard(e.to_string())),
        }
    }

    fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height, len) = (self.width, self.height, self.rgba.len());
        if width == 0 || height == 0 {
            return Err(FeedbackError::InvalidImage { width, height, len });
        }
        RgbaImage::from_raw(width as u32, height as u32, self.rgba)
            .ok_or(FeedbackError::InvalidImage { width, height, len })
    }
}

/// File name for a pasted image: `pasted_image_<timestamp>_<suffix>.png`
pub fn pasted_image_filename(now: DateTime<Local>, suffix: &str) -> String {
    format!("pasted_image_{}_{}.png", now.format("%Y%m%d_%H%M%S"), suffix)
}

/// Eight random hex characters
fn unique_suffix() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Where pasted images are stored
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `images/` beside the running executable
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .map(|p| p.join(IMAGES_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(IMAGES_DIR_NAME));
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
            debug!("Created images directory {}", self.dir.display());
        }
        Ok(())
    }

    fn next_path(&self) -> PathBuf {
        self.dir.join(pasted_image_filename(Local::now(), &unique_suffix()))
    }

    /// Write a clipboard bitmap as PNG and return its path
    pub fn save_pasted(&self, image: PastedImage) -> Result<PathBuf> {
        let rgba = image.into_rgba_image()?;
        self.ensure_dir()?;
        let path = self.next_path();
        rgba.save_with_format(&path, image::ImageFormat::Png)?;
        info!("Saved pasted image {}", path.display());
        Ok(path)
    }

    /// Re-encode an image file from disk into the store
    pub fn import_file(&self, source: &Path) -> Result<PathBuf> {
        let img = image::open(source).map_err(|source_err| FeedbackError::ImageDecode {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        self.ensure_dir()?;
        let path = self.next_path();
        img.save_with_format(&path, image::ImageFormat::Png)?;
        info!("Attached {} as {}", source.display(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn red_square(size: usize) -> PastedImage {
        PastedImage {
            width: size,
            height: size,
            rgba: [255u8, 0, 0, 255].repeat(size * size),
        }
    }

    #[test]
    fn test_filename_format() {
        let now = Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(
            pasted_image_filename(now, "a1b2c3d4"),
            "pasted_image_20250307_140509_a1b2c3d4.png"
        );
    }

    #[test]
    fn test_unique_suffix_is_short_hex() {
        let a = unique_suffix();
        let b = unique_suffix();
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_save_pasted_creates_dir_and_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("images"));

        let path = store.save_pasted(red_square(2)).unwrap();
        assert!(path.starts_with(store.dir()));
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("pasted_image_") && n.ends_with(".png")));

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_consecutive_pastes_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let first = store.save_pasted(red_square(1)).unwrap();
        let second = store.save_pasted(red_square(1)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_save_rejects_truncated_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let broken = PastedImage {
            width: 4,
            height: 4,
            rgba: vec![0; 10],
        };
        let err = store.save_pasted(broken).unwrap_err();
        assert!(matches!(
            err,
            FeedbackError::InvalidImage {
                width: 4,
                height: 4,
                len: 10
            }
        ));
    }

    #[test]
    fn test_import_undecodable_file_reports_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.png");
        std::fs::write(&source, b"not an image").unwrap();

        let store = ImageStore::new(dir.path().join("images"));
        let err = store.import_file(&source).unwrap_err();
        assert!(matches!(&err, FeedbackError::ImageDecode { path, .. } if path == &source));
        assert!(err.to_string().starts_with("Failed to decode image"));
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_import_missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let err = store.import_file(&dir.path().join("gone.png")).unwrap_err();
        assert!(matches!(err, FeedbackError::ImageDecode { .. }));
    }

    #[test]
    fn test_import_file_reencodes_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shot.bmp");
        RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 255, 255]))
            .save_with_format(&source, image::ImageFormat::Bmp)
            .unwrap();

        let store = ImageStore::new(dir.path().join("images"));
        let imported = store.import_file(&source).unwrap();
        assert_eq!(imported.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(image::open(&imported).unwrap().width(), 3);
    }
}
