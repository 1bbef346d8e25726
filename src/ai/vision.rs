use std::fmt;
use std::future::Future;

use crate::error::ModelError;

/// Raster formats the vision model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMime {
    /// Parse a declared MIME type such as `image/jpeg`. Returns `None` for
    /// non-image or unsupported types.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            "image/gif" => Some(ImageMime::Gif),
            "image/webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Gif => "image/gif",
            ImageMime::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image plus its instructions.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub image: &'a [u8],
    pub mime: ImageMime,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

/// A vision-capable language model: image and prompt in, raw text out.
pub trait VisionModel: Send + Sync {
    fn complete(
        &self,
        request: VisionRequest<'_>,
    ) -> impl Future<Output = Result<String, ModelError>> + Send;
}
