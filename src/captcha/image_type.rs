//! Output image formats.

use crate::config::CaptchaError;
use image::ImageFormat;
use std::fmt;

/// Encoded format of a captcha image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageType {
    Jpg,
    Jpeg,
    Bmp,
    Gif,
    #[default]
    Png,
}

impl ImageType {
    /// Every supported format, in declaration order.
    pub const ALL: [Self; 5] = [Self::Jpg, Self::Jpeg, Self::Bmp, Self::Gif, Self::Png];

    /// Encoder format name.
    #[must_use]
    pub const fn format_name(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Png => "png",
        }
    }

    /// MIME type used in data URIs.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Png => "image/png",
        }
    }

    pub(crate) const fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpg | Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

impl std::str::FromStr for ImageType {
    type Err = CaptchaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            "png" => Ok(Self::Png),
            other => Err(CaptchaError::Config(format!(
                "unsupported image type: {other}"
            ))),
        }
    }
}
