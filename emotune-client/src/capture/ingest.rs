//! Image ingest adapter
//!
//! Every input path (camera snapshot, file picker, drag-and-drop, encoded
//! data URI) converges on the same CapturedImage so the analysis call has a
//! single input type.

use crate::error::CaptureError;
use crate::models::{CapturedImage, FileBlob};
use base64::Engine;

/// Normalizes raw image inputs
pub struct ImageIngestAdapter;

impl ImageIngestAdapter {
    /// Accept a picked file; its declared type must be `image/*`
    pub fn from_file(blob: FileBlob) -> Result<CapturedImage, CaptureError> {
        let declared = blob
            .declared_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CaptureError::UnsupportedType("unknown".to_string()))?;

        if !is_image_type(declared) {
            return Err(CaptureError::UnsupportedType(declared.to_string()));
        }
        if blob.bytes.is_empty() {
            return Err(CaptureError::UnsupportedType(format!("{} (empty file)", declared)));
        }

        let filename = if blob.name.trim().is_empty() {
            default_filename(declared)
        } else {
            blob.name
        };
        Ok(CapturedImage::new(blob.bytes, declared.to_ascii_lowercase(), filename))
    }

    /// Accept a drag-and-drop; only the first file is used
    pub fn from_drop(files: Vec<FileBlob>) -> Result<CapturedImage, CaptureError> {
        let first = files
            .into_iter()
            .next()
            .ok_or_else(|| CaptureError::UnsupportedType("no file dropped".to_string()))?;
        Self::from_file(first)
    }

    /// Decode `data:<mime>;base64,<payload>`
    pub fn from_data_uri(uri: &str) -> Result<CapturedImage, CaptureError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| CaptureError::MalformedDataUri("missing data: scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CaptureError::MalformedDataUri("missing ',' separator".to_string()))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim();
        if mime.is_empty() || !mime.contains('/') {
            return Err(CaptureError::MalformedDataUri("missing MIME segment".to_string()));
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(CaptureError::MalformedDataUri(
                "only base64 payloads are supported".to_string(),
            ));
        }
        if !is_image_type(mime) {
            return Err(CaptureError::UnsupportedType(mime.to_string()));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| CaptureError::MalformedDataUri(format!("bad base64 payload: {}", e)))?;
        if bytes.is_empty() {
            return Err(CaptureError::MalformedDataUri("empty payload".to_string()));
        }

        let mime = mime.to_ascii_lowercase();
        let filename = default_filename(&mime);
        Ok(CapturedImage::new(bytes, mime, filename))
    }

    /// Encode an image back to its data URI (preview form)
    pub fn to_data_uri(image: &CapturedImage) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(image.bytes());
        format!("data:{};base64,{}", image.mime_type(), b64)
    }
}

fn is_image_type(mime: &str) -> bool {
    mime.to_ascii_lowercase().starts_with("image/")
}

/// `capture.<subtype>`, e.g. `capture.jpeg`
fn default_filename(mime: &str) -> String {
    let subtype = mime
        .split('/')
        .nth(1)
        .map(|s| s.split('+').next().unwrap_or(s))
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("img");
    format!("capture.{}", subtype.to_ascii_lowercase())
}
