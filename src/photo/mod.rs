use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

const GALLERY_EXTENSION: &str = "jpg";
const CAPTURE_EXTENSION: &str = "png";
const DEFAULT_FALLBACK_TEMP_DIR: &str = "/tmp/catalogue";

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("photo source not found: {path}")]
    SourceNotFound { path: PathBuf },
    #[error("failed to encode camera frame {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type PhotoResult<T> = std::result::Result<T, PhotoError>;

/// Directory holding every photo attached to an article.
///
/// Photos are never deleted by the catalogue; removing an article leaves its
/// file in place.
#[derive(Debug, Clone)]
pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn open(dir: impl Into<PathBuf>) -> PhotoResult<Self> {
        let library = Self::with_dir(dir);
        fs::create_dir_all(&library.dir)?;
        Ok(library)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copies a picked image into the library as `<MMSS>.jpg`.
    ///
    /// A file with the same name is overwritten.
    pub fn import_from_gallery(&self, source: &Path) -> PhotoResult<PathBuf> {
        if !source.is_file() {
            tracing::warn!(path = %source.display(), "gallery photo source missing");
            return Err(PhotoError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let target = self.dir.join(gallery_file_name(unix_seconds()));
        save_overwrite(source, &target)?;
        tracing::info!(
            source = %source.display(),
            target = %target.display(),
            "imported gallery photo"
        );
        Ok(target)
    }

    pub fn allocate_capture_path(&self) -> PathBuf {
        self.dir.join(capture_file_name(unix_seconds()))
    }

    /// Writes a camera frame as PNG to a freshly allocated path.
    pub fn save_frame(&self, frame: &DynamicImage) -> PhotoResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.allocate_capture_path();
        frame
            .save_with_format(&target, ImageFormat::Png)
            .map_err(|source| PhotoError::Encode {
                path: target.clone(),
                source,
            })?;
        tracing::info!(
            target = %target.display(),
            width = frame.width(),
            height = frame.height(),
            "saved camera frame"
        );
        Ok(target)
    }
}

/// Returns the photo path when the file is still on disk.
pub fn resolve_display(photo_path: Option<&Path>) -> Option<PathBuf> {
    let path = photo_path?;
    if path.is_file() {
        Some(path.to_path_buf())
    } else {
        tracing::debug!(path = %path.display(), "photo missing; using placeholder");
        None
    }
}

pub(crate) fn runtime_temp_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR")
        .map(|dir| PathBuf::from(dir).join("catalogue"))
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FALLBACK_TEMP_DIR))
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

fn gallery_file_name(seconds: u64) -> String {
    let minute = (seconds / 60) % 60;
    let second = seconds % 60;
    format!("{minute:02}{second:02}.{GALLERY_EXTENSION}")
}

fn capture_file_name(seconds: u64) -> String {
    let hour = (seconds / 3_600) % 24;
    let minute = (seconds / 60) % 60;
    let second = seconds % 60;
    format!("{hour:02}{minute:02}{second:02}.{CAPTURE_EXTENSION}")
}

fn save_overwrite(source: &Path, destination: &Path) -> PhotoResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    if is_same_file(source, destination) {
        tracing::debug!(path = %destination.display(), "photo already in library");
        return Ok(());
    }

    fs::copy(source, destination)?;
    Ok(())
}

fn is_same_file(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "catalogue-photo-{label}-{}-{unique}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn gallery_file_name_uses_minute_and_second() {
        // 01:02:03 UTC
        assert_eq!(gallery_file_name(3_723), "0203.jpg");
        assert_eq!(gallery_file_name(0), "0000.jpg");
    }

    #[test]
    fn capture_file_name_uses_hour_minute_and_second() {
        assert_eq!(capture_file_name(3_723), "010203.png");
    }

    #[test]
    fn import_from_gallery_copies_into_library() {
        let root = temp_dir("import");
        let source = root.join("pick.jpeg");
        fs::write(&source, b"jpeg-bytes").expect("seed source");
        let library = PhotoLibrary::open(root.join("photos")).expect("library should open");

        let copied = library
            .import_from_gallery(&source)
            .expect("import should copy");

        assert!(copied.starts_with(library.dir()));
        assert_eq!(
            copied.extension().and_then(|ext| ext.to_str()),
            Some("jpg")
        );
        assert_eq!(fs::read(&copied).expect("copy exists"), b"jpeg-bytes");
        assert!(source.exists());
    }

    #[test]
    fn import_from_gallery_reports_missing_source() {
        let root = temp_dir("missing");
        let library = PhotoLibrary::with_dir(root.join("photos"));

        let err = library
            .import_from_gallery(&root.join("absent.jpg"))
            .expect_err("missing source should fail");
        assert!(matches!(err, PhotoError::SourceNotFound { .. }));
    }

    #[test]
    fn import_from_gallery_rejects_directories() {
        let root = temp_dir("dir-source");
        let library = PhotoLibrary::with_dir(root.join("photos"));

        let err = library
            .import_from_gallery(&root)
            .expect_err("directory source should fail");
        assert!(matches!(err, PhotoError::SourceNotFound { .. }));
    }

    #[test]
    fn save_overwrite_keeps_file_copied_onto_itself() {
        let root = temp_dir("self-copy");
        let photos = root.join("photos");
        fs::create_dir_all(&photos).expect("mkdir");
        let existing = photos.join("0203.jpg");
        fs::write(&existing, b"already-imported").expect("seed photo");

        let aliased = root.join("photos").join(".").join("0203.jpg");
        save_overwrite(&aliased, &existing).expect("copy onto itself should succeed");

        assert_eq!(
            fs::read(&existing).expect("photo should survive"),
            b"already-imported"
        );
    }

    #[test]
    fn save_overwrite_replaces_other_file_with_same_name() {
        let root = temp_dir("replace");
        let source = root.join("pick.jpeg");
        let destination = root.join("photos").join("0203.jpg");
        fs::create_dir_all(root.join("photos")).expect("mkdir");
        fs::write(&source, b"new").expect("seed source");
        fs::write(&destination, b"old").expect("seed destination");

        save_overwrite(&source, &destination).expect("copy should overwrite");

        assert_eq!(fs::read(&destination).expect("destination exists"), b"new");
        assert!(source.exists());
    }

    #[test]
    fn save_frame_writes_png_file() {
        let root = temp_dir("frame");
        let library = PhotoLibrary::with_dir(root.join("photos"));
        let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([200, 10, 10])));

        let path = library.save_frame(&frame).expect("frame should save");

        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("png"));
        let decoded = image::open(&path).expect("saved frame should decode");
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn resolve_display_falls_back_when_file_missing() {
        let root = temp_dir("display");
        let present = root.join("0001.jpg");
        fs::write(&present, b"x").expect("seed photo");

        assert_eq!(resolve_display(Some(&present)), Some(present.clone()));
        assert_eq!(resolve_display(Some(&root.join("gone.jpg"))), None);
        assert_eq!(resolve_display(None), None);
    }
}
