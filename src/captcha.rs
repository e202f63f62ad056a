//! CAPTCHA generation.
//!
//! Image synthesis, font resources, and the generated challenge value.

pub mod challenge;
pub mod fonts;
pub mod generator;
pub mod image_type;

pub use challenge::Captcha;
pub use fonts::{EmbeddedFonts, FONT_COUNT, FontCache, FontDirectory, FontIndex, FontSource};
pub use generator::{CHARSET, CaptchaGenerator, GeneratorBuilder};
pub use image_type::ImageType;
