//! Configuration settings.
//!
//! Defines the generator configuration and environment variable loading logic.

use crate::captcha::ImageType;
use crate::config::{CaptchaError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CODE_LENGTH: usize = 4;
pub const DEFAULT_IMAGE_WIDTH: u32 = 100;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 34;
pub const DEFAULT_MASK_LINE_NUMBER: u32 = 50;

fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_u32_or(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_env_usize_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Immutable parameters of a captcha generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    /// Number of characters in each code.
    pub code_length: usize,
    /// Encoded output format.
    pub image_type: ImageType,
    /// Canvas width in pixels.
    pub image_width: u32,
    /// Canvas height in pixels.
    pub image_height: u32,
    /// Count of noise line segments drawn over the background.
    pub mask_line_number: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            image_type: ImageType::Png,
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            mask_line_number: DEFAULT_MASK_LINE_NUMBER,
        }
    }
}

impl GeneratorConfig {
    /// Checks that every dimension is positive.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if the code length, width, or height is zero.
    pub fn validate(&self) -> Result<()> {
        if self.code_length == 0 {
            return Err(CaptchaError::Config(
                "code length must be positive".to_string(),
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(CaptchaError::Config(format!(
                "image size must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }
}

/// Generator settings loaded from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Image and code parameters.
    pub generator: GeneratorConfig,
    /// Directory holding `captcha_font_<n>.ttf` files; embedded fonts when unset.
    pub font_dir: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from `CAPTCHA_*` environment variables.
    ///
    /// Numeric variables that are missing or unparsable fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if `CAPTCHA_IMAGE_TYPE` names an unknown format
    /// or the resulting configuration is invalid.
    pub fn from_env() -> Result<Self> {
        let image_type = get_env_or("CAPTCHA_IMAGE_TYPE", "png").parse()?;
        let generator = GeneratorConfig {
            code_length: get_env_usize_or("CAPTCHA_CODE_LENGTH", DEFAULT_CODE_LENGTH),
            image_type,
            image_width: get_env_u32_or("CAPTCHA_IMAGE_WIDTH", DEFAULT_IMAGE_WIDTH),
            image_height: get_env_u32_or("CAPTCHA_IMAGE_HEIGHT", DEFAULT_IMAGE_HEIGHT),
            mask_line_number: get_env_u32_or("CAPTCHA_MASK_LINES", DEFAULT_MASK_LINE_NUMBER),
        };
        generator.validate()?;

        let font_dir = env::var("CAPTCHA_FONT_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            generator,
            font_dir,
        })
    }
}
