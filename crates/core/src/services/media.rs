//! Raster variant generation for uploaded photos.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, imageops::FilterType};
use pic4pick_common::{AppError, AppResult, config::MediaConfig};

/// An encoded, resized copy of an upload.
#[derive(Debug, Clone)]
pub struct RenderedVariant {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Thumbnail and preview renditions of one upload.
#[derive(Debug, Clone)]
pub struct PhotoVariants {
    pub thumbnail: RenderedVariant,
    pub preview: RenderedVariant,
}

/// Format for an upload extension, if variants can be produced for it.
#[must_use]
pub fn format_for_extension(ext: &str) -> Option<ImageFormat> {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "webp" => Some(ImageFormat::WebP),
        "gif" => Some(ImageFormat::Gif),
        _ => None,
    }
}

/// MIME type for an upload extension.
#[must_use]
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Media processing service.
#[derive(Debug, Clone, Copy)]
pub struct MediaService {
    config: MediaConfig,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub const fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Decode `data` once and render both variants in `format`.
    pub fn render_variants(&self, data: &[u8], format: ImageFormat) -> AppResult<PhotoVariants> {
        let image = image::load_from_memory(data)
            .map_err(|e| AppError::BadRequest(format!("Failed to decode image: {e}")))?;

        Ok(PhotoVariants {
            thumbnail: encode(&fit_within(&image, self.config.thumbnail_max_edge), format)?,
            preview: encode(&fit_within(&image, self.config.preview_max_edge), format)?,
        })
    }
}

/// Downscale so the longest edge is at most `max_edge`. Never upscales.
fn fit_within(image: &DynamicImage, max_edge: u32) -> DynamicImage {
    if image.width().max(image.height()) <= max_edge {
        return image.clone();
    }
    image.resize(max_edge, max_edge, FilterType::Lanczos3)
}

fn encode(image: &DynamicImage, format: ImageFormat) -> AppResult<RenderedVariant> {
    let mut buffer = Cursor::new(Vec::new());

    // JPEG has no alpha channel; the WebP and GIF encoders take 8-bit RGBA
    let result = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut buffer, format),
        ImageFormat::WebP | ImageFormat::Gif => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, format)
        }
        _ => image.write_to(&mut buffer, format),
    };
    result.map_err(|e| AppError::Internal(format!("Failed to encode variant: {e}")))?;

    Ok(RenderedVariant {
        data: buffer.into_inner(),
        width: image.width(),
        height: image.height(),
    })
}
