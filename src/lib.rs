//! Captcha image generation.
//!
//! Renders a short random code into a distorted raster image and returns it
//! together with the plaintext answer. Images can be embedded directly as
//! `data:` URIs through the crate's own Base64 codec.
//!
//! ```no_run
//! use glyphgate::{CaptchaGenerator, ImageType};
//!
//! # fn main() -> glyphgate::Result<()> {
//! let generator = CaptchaGenerator::builder()
//!     .code_length(6)
//!     .image(Some(ImageType::Jpeg), Some(160), Some(48))
//!     .mask_line_number(80)
//!     .build()?;
//!
//! let captcha = generator.generate()?;
//! let uri = captcha.to_image_data_uri();
//! assert!(uri.starts_with("data:image/jpeg;base64,"));
//! # Ok(())
//! # }
//! ```

pub mod captcha;
pub mod codec;
pub mod config;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use captcha::{Captcha, CaptchaGenerator, FontCache, FontIndex, GeneratorBuilder, ImageType};
pub use config::{CaptchaError, GenerationKind, GeneratorConfig, Result, Settings};
