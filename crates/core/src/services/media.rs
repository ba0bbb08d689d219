//! Photo processing for nominations.

use awards_common::{AppError, AppResult, config::MediaSettings};
use image::{DynamicImage, GenericImageView, codecs::jpeg::JpegEncoder, imageops::FilterType};
use serde::{Deserialize, Serialize};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// WebP format
    WebP,
    /// GIF format
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    const fn decoder_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::WebP => image::ImageFormat::WebP,
            Self::Gif => image::ImageFormat::Gif,
        }
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A compressed photo ready for upload.
#[derive(Debug)]
pub struct ProcessedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub dimensions: ImageDimensions,
}

/// Media processing configuration.
#[derive(Debug, Clone, Copy)]
pub struct MediaConfig {
    /// Longest allowed side of a stored photo
    pub max_dimension: u32,
    /// JPEG quality, 1-100
    pub quality: u8,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_dimension: 600,
            quality: 80,
        }
    }
}

impl From<MediaSettings> for MediaConfig {
    fn from(settings: MediaSettings) -> Self {
        Self {
            max_dimension: settings.max_photo_dimension,
            quality: settings.photo_quality,
        }
    }
}

/// Media processing service.
#[derive(Clone)]
pub struct MediaService {
    config: MediaConfig,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub const fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Detect image format from magic bytes.
    pub fn detect_image_format(&self, data: &[u8]) -> AppResult<ImageFormat> {
        if data.len() < 12 {
            return Err(AppError::Validation(
                "Data too short to detect format".to_string(),
            ));
        }

        // JPEG: FF D8 FF
        if data[0..3] == [0xFF, 0xD8, 0xFF] {
            return Ok(ImageFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Ok(ImageFormat::Png);
        }

        // GIF: GIF87a or GIF89a
        if data[0..3] == [0x47, 0x49, 0x46] {
            return Ok(ImageFormat::Gif);
        }

        // WebP: RIFF....WEBP
        if data[0..4] == [0x52, 0x49, 0x46, 0x46] && data[8..12] == [0x57, 0x45, 0x42, 0x50] {
            return Ok(ImageFormat::WebP);
        }

        Err(AppError::Validation(
            "Unknown or unsupported image format".to_string(),
        ))
    }

    /// Whether `mime_type` names a photo format we can compress.
    #[must_use]
    pub fn is_supported_image(&self, mime_type: &str) -> bool {
        ImageFormat::from_mime_type(mime_type).is_some()
    }

    /// Shrink a photo to fit the configured bounding box and re-encode it
    /// as JPEG. Aspect ratio is kept and small photos are not enlarged.
    pub fn compress_photo(&self, data: &[u8]) -> AppResult<ProcessedImage> {
        let format = self.detect_image_format(data)?;
        let decoded = image::load_from_memory_with_format(data, format.decoder_format())
            .map_err(|e| AppError::Validation(format!("Could not decode photo: {e}")))?;

        let max = self.config.max_dimension;
        let resized = if decoded.width() > max || decoded.height() > max {
            decoded.resize(max, max, FilterType::Lanczos3)
        } else {
            decoded
        };

        let data = self.encode_jpeg(&resized)?;
        let (width, height) = resized.dimensions();

        tracing::debug!(
            input_format = ?format,
            width,
            height,
            bytes = data.len(),
            "Compressed photo"
        );

        Ok(ProcessedImage {
            data,
            format: ImageFormat::Jpeg,
            dimensions: ImageDimensions { width, height },
        })
    }

    fn encode_jpeg(&self, img: &DynamicImage) -> AppResult<Vec<u8>> {
        let rgb = img.to_rgb8();
        let mut out = Vec::new();
        let quality = self.config.quality.clamp(1, 100);
        JpegEncoder::new_with_quality(&mut out, quality)
            .encode_image(&rgb)
            .map_err(|e| AppError::Internal(format!("JPEG encoding failed: {e}")))?;
        Ok(out)
    }
}
