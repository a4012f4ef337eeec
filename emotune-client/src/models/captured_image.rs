//! Canonical encoded image and raw file input

use std::path::Path;
use std::sync::Arc;

/// Encoded still image, whatever its origin (camera, picker, drop, data URI)
///
/// Immutable once built; a re-capture replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Arc<[u8]>,
    mime_type: String,
    filename: String,
}

impl CapturedImage {
    /// Construction is restricted to the ingest adapter and camera sources
    pub(crate) fn new(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A file as handed over by a picker or a drop target
///
/// `declared_type` plays the role of a browser `File.type`: it may be absent
/// and is what the ingest adapter validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub name: String,
    pub declared_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, declared_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.map(str::to_string),
            bytes,
        }
    }

    /// Read a file from disk, sniffing its type from content then extension
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let declared_type = sniff_mime(&bytes).or_else(|| mime_from_extension(path));
        Ok(Self {
            name,
            declared_type: declared_type.map(str::to_string),
            bytes,
        })
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "txt" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_read_sniffs_content_over_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.txt");
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(&path, &bytes).unwrap();

        let blob = FileBlob::read(&path).await.unwrap();
        assert_eq!(blob.name, "photo.txt");
        assert_eq!(blob.declared_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_read_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"just some words").unwrap();

        let blob = FileBlob::read(&path).await.unwrap();
        assert_eq!(blob.declared_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_captured_image_accessors() {
        let image = CapturedImage::new(vec![1, 2, 3], "image/jpeg", "capture.jpeg");
        assert_eq!(image.len(), 3);
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.filename(), "capture.jpeg");
        assert!(!image.is_empty());
    }
}
