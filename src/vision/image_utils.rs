// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image payload handling for recognition requests
//!
//! Payloads are kept encoded. Nothing here decodes pixels: the vision service
//! receives the original bytes together with a MIME type sniffed from the
//! magic bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Maximum image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// MIME type declared when neither the bytes nor the caller identify the format
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Errors raised while building an image payload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Image data is empty")]
    EmptyData,
}

impl From<base64::DecodeError> for ImageError {
    fn from(err: base64::DecodeError) -> Self {
        ImageError::InvalidBase64(err.to_string())
    }
}

/// An encoded image as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImagePayload {
    /// Wrap raw image bytes (for multipart uploads or files read from disk)
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        Self::with_declared_mime(bytes, None)
    }

    /// Decode a bare base64 string
    pub fn from_base64(base64_str: &str) -> Result<Self, ImageError> {
        if base64_str.trim().is_empty() {
            return Err(ImageError::EmptyData);
        }
        let bytes = STANDARD.decode(base64_str.trim())?;
        Self::from_bytes(bytes)
    }

    /// Decode a `data:<mime>;base64,<data>` URL
    ///
    /// A string without the `data:` prefix is treated as bare base64, so
    /// callers can pass either form.
    ///
    /// # Example
    /// ```ignore
    /// let payload = ImagePayload::from_data_url("data:image/png;base64,iVBORw0KGgo...")?;
    /// assert_eq!(payload.mime_type(), "image/png");
    /// ```
    pub fn from_data_url(input: &str) -> Result<Self, ImageError> {
        let input = input.trim();
        let Some(rest) = input.strip_prefix("data:") else {
            return Self::from_base64(input);
        };

        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidDataUrl("missing ',' separator".to_string()))?;

        let declared = match header.strip_suffix(";base64") {
            Some(mime) => mime,
            None => {
                return Err(ImageError::InvalidDataUrl(
                    "only base64 data URLs are supported".to_string(),
                ))
            }
        };

        if data.is_empty() {
            return Err(ImageError::EmptyData);
        }

        let bytes = STANDARD.decode(data)?;
        let declared = (!declared.is_empty()).then(|| declared.to_string());
        Self::with_declared_mime(bytes, declared)
    }

    fn with_declared_mime(bytes: Vec<u8>, declared: Option<String>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyData);
        }

        if bytes.len() > MAX_IMAGE_SIZE {
            return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
        }

        let mime_type = detect_format(&bytes)
            .map(|format| format.to_mime_type().to_string())
            .or(declared)
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        Ok(Self { bytes, mime_type })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Base64 body without any data-URL header
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Shared handle to an image used by a recognition attempt
///
/// Cloning is cheap; every clone refers to the same payload and identity.
#[derive(Debug, Clone)]
pub struct ImageRef {
    id: Uuid,
    payload: Arc<ImagePayload>,
}

impl ImageRef {
    pub fn new(payload: ImagePayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: Arc::new(payload),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payload(&self) -> &ImagePayload {
        &self.payload
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageRef {}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct View<'a> {
            id: Uuid,
            mime_type: &'a str,
            size_bytes: usize,
            data_url: String,
        }

        View {
            id: self.id,
            mime_type: self.payload.mime_type(),
            size_bytes: self.payload.size_bytes(),
            data_url: self.payload.to_data_url(),
        }
        .serialize(serializer)
    }
}

/// Detect image format from magic bytes
///
/// Returns `None` when the bytes match no supported signature.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.len() < 4 {
        return None;
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Some(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Some(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Some(ImageFormat::Tiff),

        _ => None,
    }
}
