//! Attachment classification, loading, and upload limits.

use image::ImageFormat;
use parley_config::UploadConfig;
use parley_core::attachment::{AttachmentKind, FileClassifier};
use parley_core::error::AttachmentError;
use parley_core::provider::Media;
use std::io::Cursor;
use std::path::Path;

/// Classifies files by extension using `mime_guess`.
///
/// `image/*` is an image; `text/*` and `application/*` are treated as
/// documents; everything else (audio, video, unknown) is unrecognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeClassifier;

impl FileClassifier for MimeClassifier {
    fn classify(&self, path: &Path) -> AttachmentKind {
        let Some(mime) = mime_guess::from_path(path).first() else {
            return AttachmentKind::Unrecognized;
        };

        let mime_type = mime.essence_str().to_string();
        match mime.type_().as_str() {
            "image" => AttachmentKind::Image { mime_type },
            "text" | "application" => AttachmentKind::Document { mime_type },
            _ => AttachmentKind::Unrecognized,
        }
    }
}

/// Read an attachment into provider media according to its classification.
///
/// The file is read fully into memory and closed before this returns. Images
/// are decoded; their MIME type comes from the decoded content, not the file
/// extension.
/// Returns `None` for [`AttachmentKind::Unrecognized`].
pub fn load(path: &Path, kind: &AttachmentKind) -> Result<Option<Media>, AttachmentError> {
    match kind {
        AttachmentKind::Image { .. } => load_image(path).map(Some),
        AttachmentKind::Document { .. } => load_text(path).map(Some),
        AttachmentKind::Unrecognized => Ok(None),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, AttachmentError> {
    std::fs::read(path).map_err(|source| AttachmentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_text(path: &Path) -> Result<Media, AttachmentError> {
    let bytes = read_bytes(path)?;
    let text = String::from_utf8(bytes).map_err(|_| AttachmentError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    Ok(Media::Text(text))
}

/// Formats the model accepts as inline image data; anything else is re-encoded as PNG.
const INLINE_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

fn load_image(path: &Path) -> Result<Media, AttachmentError> {
    let data = read_bytes(path)?;

    let invalid = |reason: String| AttachmentError::InvalidImage {
        path: path.to_path_buf(),
        reason,
    };

    let reader = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .map_err(|e| invalid(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| invalid("unrecognized image format".into()))?;

    let decoded = reader.decode().map_err(|e| invalid(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());

    if INLINE_FORMATS.contains(&format) {
        return Ok(Media::Image {
            mime_type: format.to_mime_type().to_string(),
            data,
            width,
            height,
        });
    }

    tracing::debug!(path = %path.display(), ?format, "Re-encoding image as PNG");
    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| invalid(e.to_string()))?;

    Ok(Media::Image {
        mime_type: ImageFormat::Png.to_mime_type().to_string(),
        data: png.into_inner(),
        width,
        height,
    })
}

/// Size and extension limits applied by the caller before routing a file.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_extensions: config
                .allowed_file_types
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    /// Reject files with a disallowed extension or over the size limit.
    pub fn check(&self, path: &Path) -> Result<(), AttachmentError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !self.allowed_extensions.iter().any(|e| *e == extension) {
            return Err(AttachmentError::DisallowedType { extension });
        }

        let size = std::fs::metadata(path)
            .map_err(|source| AttachmentError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        if size > self.max_file_size {
            return Err(AttachmentError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_file_size,
            });
        }

        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn classifies_by_mime_family() {
        let c = MimeClassifier;
        assert_eq!(
            c.classify(Path::new("photo.PNG")),
            AttachmentKind::Image {
                mime_type: "image/png".into()
            }
        );
        assert_eq!(
            c.classify(Path::new("notes.txt")),
            AttachmentKind::Document {
                mime_type: "text/plain".into()
            }
        );
        assert_eq!(
            c.classify(Path::new("data.json")),
            AttachmentKind::Document {
                mime_type: "application/json".into()
            }
        );
        assert_eq!(c.classify(Path::new("song.mp3")), AttachmentKind::Unrecognized);
        assert_eq!(c.classify(Path::new("no_extension")), AttachmentKind::Unrecognized);
    }

    #[test]
    fn loads_text_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello from a file").unwrap();

        let kind = MimeClassifier.classify(&path);
        let media = load(&path, &kind).unwrap();
        assert_eq!(media, Some(Media::Text("hello from a file".into())));
    }

    #[test]
    fn non_utf8_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let err = load(&path, &MimeClassifier.classify(&path)).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidUtf8 { .. }));
    }

    #[test]
    fn loads_image_with_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        write_png(&path, 3, 2);

        let media = load(&path, &MimeClassifier.classify(&path)).unwrap().unwrap();
        match media {
            Media::Image {
                mime_type,
                data,
                width,
                height,
            } => {
                assert_eq!(mime_type, "image/png");
                assert!(!data.is_empty());
                assert_eq!((width, height), (3, 2));
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn bmp_is_reencoded_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.bmp");
        image::RgbImage::new(2, 2).save(&path).unwrap();

        let media = load(&path, &MimeClassifier.classify(&path)).unwrap().unwrap();
        match media {
            Media::Image {
                mime_type,
                data,
                width,
                height,
            } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(&data[1..4], b"PNG");
                assert_eq!((width, height), (2, 2));
                assert_eq!(
                    image::guess_format(&data).unwrap(),
                    ImageFormat::Png
                );
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn mime_type_follows_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        write_png(&png, 2, 2);
        let mislabeled = dir.path().join("shot.jpg");
        std::fs::copy(&png, &mislabeled).unwrap();

        let kind = MimeClassifier.classify(&mislabeled);
        assert_eq!(kind.mime_type(), Some("image/jpeg"));

        match load(&mislabeled, &kind).unwrap().unwrap() {
            Media::Image { mime_type, data, .. } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(data, std::fs::read(&png).unwrap());
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load(&path, &MimeClassifier.classify(&path)).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidImage { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = Path::new("/nonexistent/parley/notes.txt");
        let err = load(path, &MimeClassifier.classify(path)).unwrap_err();
        assert!(matches!(err, AttachmentError::Io { .. }));
    }

    #[test]
    fn unrecognized_loads_nothing() {
        let media = load(Path::new("clip.mp4"), &AttachmentKind::Unrecognized).unwrap();
        assert!(media.is_none());
    }

    #[test]
    fn policy_enforces_extension_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("small.txt");
        std::fs::write(&ok, "tiny").unwrap();
        let big = dir.path().join("big.txt");
        std::fs::write(&big, vec![b'x'; 64]).unwrap();
        let script = dir.path().join("run.sh");
        std::fs::write(&script, "echo").unwrap();

        let policy = UploadPolicy {
            max_file_size: 16,
            allowed_extensions: vec!["txt".into()],
        };

        assert!(policy.check(&ok).is_ok());
        assert!(matches!(
            policy.check(&big),
            Err(AttachmentError::TooLarge { size: 64, limit: 16, .. })
        ));
        assert!(matches!(
            policy.check(&script),
            Err(AttachmentError::DisallowedType { .. })
        ));
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.max_file_size, 10 * 1024 * 1024);
        assert!(policy.allowed_extensions.contains(&"png".to_string()));
        assert!(policy.allowed_extensions.contains(&"pdf".to_string()));
    }
}
