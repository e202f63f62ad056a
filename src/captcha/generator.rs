//! CAPTCHA generation logic.
//!
//! Renders a random code over a light background with dark noise segments,
//! then encodes the canvas in the configured image format. Every random draw
//! comes from the thread-local CSPRNG returned by `rand::rng()`.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use rand::Rng;
use std::io::Cursor;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

use crate::captcha::fonts::{FontCache, FontDirectory, FontIndex};
use crate::captcha::{Captcha, ImageType};
use crate::config::{CaptchaError, GenerationKind, GeneratorConfig, Result, Settings};

/// Code alphabet without look-alike glyphs (0, 1, 5, 8, 9, B, L, O, S).
pub const CHARSET: &[u8] = b"23467ACDEFGHIJKMNPQRTUVWXYZ";

/// Glyph em size relative to image height.
const FONT_SCALE: f32 = 0.8;

/// Generates distorted-text image CAPTCHAs.
///
/// A generator is immutable after construction and can be shared across
/// threads; concurrent calls to [`CaptchaGenerator::generate`] only share
/// the font cache.
#[derive(Debug, Clone)]
pub struct CaptchaGenerator {
    config: GeneratorConfig,
    fonts: Arc<FontCache>,
}

/// Builds [`CaptchaGenerator`]s, starting from the default configuration.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct GeneratorBuilder {
    config: GeneratorConfig,
    fonts: Option<Arc<FontCache>>,
}

impl GeneratorBuilder {
    /// Sets the number of characters in each code.
    pub fn code_length(mut self, code_length: usize) -> Self {
        self.config.code_length = code_length;
        self
    }

    /// Overrides any of the image type, width, and height; `None` keeps the current value.
    pub fn image(
        mut self,
        image_type: Option<ImageType>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Self {
        if let Some(image_type) = image_type {
            self.config.image_type = image_type;
        }
        if let Some(width) = width {
            self.config.image_width = width;
        }
        if let Some(height) = height {
            self.config.image_height = height;
        }
        self
    }

    /// Sets the encoded image format.
    pub fn image_type(mut self, image_type: ImageType) -> Self {
        self.config.image_type = image_type;
        self
    }

    /// Sets the canvas size in pixels.
    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.config.image_width = width;
        self.config.image_height = height;
        self
    }

    /// Sets how many noise segments are drawn behind the code.
    pub fn mask_line_number(mut self, mask_line_number: u32) -> Self {
        self.config.mask_line_number = mask_line_number;
        self
    }

    /// Uses `fonts` instead of the process-wide embedded font cache.
    pub fn font_cache(mut self, fonts: Arc<FontCache>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Creates a generator from the accumulated settings.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if the code length or an image dimension is zero.
    pub fn build(&self) -> Result<CaptchaGenerator> {
        self.config.validate()?;
        Ok(CaptchaGenerator {
            config: self.config,
            fonts: self.fonts.clone().unwrap_or_else(FontCache::shared),
        })
    }
}

impl CaptchaGenerator {
    /// Creates a new builder with the default configuration.
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::default()
    }

    /// Process-wide generator with the default configuration, created on first use.
    #[must_use]
    pub fn default_generator() -> &'static Self {
        static DEFAULT: OnceLock<CaptchaGenerator> = OnceLock::new();
        DEFAULT.get_or_init(|| Self {
            config: GeneratorConfig::default(),
            fonts: FontCache::shared(),
        })
    }

    /// Creates a generator over the shared font cache.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if `config` is invalid.
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fonts: FontCache::shared(),
        })
    }

    /// Creates a generator from `CAPTCHA_*` environment variables.
    ///
    /// When `CAPTCHA_FONT_DIR` is set the generator gets its own cache over
    /// that directory; otherwise it uses the shared embedded fonts.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` if the environment holds an invalid configuration.
    pub fn from_env() -> Result<Self> {
        let settings = Settings::from_env()?;
        let fonts = settings.font_dir.map_or_else(FontCache::shared, |dir| {
            Arc::new(FontCache::new(FontDirectory::new(dir)))
        });
        Ok(Self {
            config: settings.generator,
            fonts,
        })
    }

    /// Configuration this generator renders with.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Font cache shared by every call to [`CaptchaGenerator::generate`].
    #[must_use]
    pub const fn font_cache(&self) -> &Arc<FontCache> {
        &self.fonts
    }

    /// Generates a new CAPTCHA challenge.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Generation` if the selected font cannot be loaded
    /// or parsed, or if the image cannot be encoded.
    pub fn generate(&self) -> Result<Captcha> {
        let mut rng = rand::rng();

        let mut img = RgbImage::from_pixel(
            self.config.image_width,
            self.config.image_height,
            background_color(&mut rng),
        );
        self.draw_mask_lines(&mut img, &mut rng);

        let code = self.next_code(&mut rng);

        let font_index = FontIndex::random(&mut rng);
        let font_bytes = self.fonts.get(font_index)?;
        let font = FontRef::try_from_slice(&font_bytes).map_err(|e| {
            warn!(font_index = %font_index, error = %e, "Failed to parse font");
            CaptchaError::generation(GenerationKind::FontFormat, e)
        })?;
        self.draw_code(&mut img, &mut rng, &font, &code);

        let image_bytes = self.encode(&img)?;
        debug!(
            code_length = code.len(),
            image_type = %self.config.image_type,
            font_index = %font_index,
            bytes = image_bytes.len(),
            "Captcha generated"
        );

        Ok(Captcha::new(code, image_bytes, self.config.image_type))
    }

    fn draw_mask_lines(&self, img: &mut RgbImage, rng: &mut impl Rng) {
        let (width, height) = img.dimensions();

        for _ in 0..self.config.mask_line_number {
            let ((start_x, start_y), (end_x, end_y)) = mask_segment(width, height, rng);
            draw_line_segment_mut(
                img,
                (u32_to_f32(start_x), u32_to_f32(start_y)),
                (u32_to_f32(end_x), u32_to_f32(end_y)),
                foreground_color(rng),
            );
        }
    }

    fn next_code(&self, rng: &mut impl Rng) -> String {
        (0..self.config.code_length)
            .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
            .collect()
    }

    fn draw_code(&self, img: &mut RgbImage, rng: &mut impl Rng, font: &FontRef<'_>, code: &str) {
        let (width, height) = img.dimensions();
        let scale = em_scale(font, u32_to_f32(height) * FONT_SCALE);
        let ascent = f32_to_i32(font.as_scaled(scale).ascent());

        let origins = glyph_origins(width, height, self.config.code_length, ascent, rng);
        let mut buf = [0u8; 4];
        for (ch, (pos_x, pos_y)) in code.chars().zip(origins) {
            let color = foreground_color(rng);
            draw_text_mut(img, color, pos_x, pos_y, scale, font, ch.encode_utf8(&mut buf));
        }
    }

    fn encode(&self, img: &RgbImage) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        img.write_to(
            &mut Cursor::new(&mut bytes),
            self.config.image_type.image_format(),
        )
        .map_err(|e| {
            warn!(image_type = %self.config.image_type, error = %e, "Image encode failed");
            CaptchaError::generation(GenerationKind::ImageEncode, e)
        })?;
        Ok(bytes)
    }
}

/// `ab_glyph` scale whose em square is `em_px` pixels tall.
///
/// `PxScale` measures ascent to descent, which for most fonts is larger than the em.
fn em_scale(font: &impl Font, em_px: f32) -> PxScale {
    let height = font.height_unscaled();
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 && height > 0.0 => {
            PxScale::from(em_px * height / units_per_em)
        }
        _ => PxScale::from(em_px),
    }
}

/// Random noise segment that starts on the canvas and spans less than
/// `width / 8` by `height / 8` pixels (a single point on tiny canvases).
fn mask_segment(width: u32, height: u32, rng: &mut impl Rng) -> ((u32, u32), (u32, u32)) {
    let max_dx = (width / 8).max(1);
    let max_dy = (height / 8).max(1);

    let start_x = rng.random_range(0..width);
    let start_y = rng.random_range(0..height);
    let end_x = start_x + rng.random_range(0..max_dx);
    let end_y = start_y + rng.random_range(0..max_dy);
    ((start_x, start_y), (end_x, end_y))
}

/// Top-left draw positions for `count` glyphs.
///
/// The canvas is split into `2 * count + 2` units; glyph `k` starts at
/// `unit * (2k + 1)`. Tops range over `[0, height - ascent)` so every
/// baseline lands in `[ascent, height)`, or sit at 0 when the ascent does not fit.
fn glyph_origins(
    width: u32,
    height: u32,
    count: usize,
    ascent: i32,
    rng: &mut impl Rng,
) -> Vec<(i32, i32)> {
    let slots = count
        .checked_mul(2)
        .and_then(|n| n.checked_add(2))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(u32::MAX);
    let unit = u32_to_i32(width / slots);
    let vertical_slack = u32_to_i32(height) - ascent;

    let mut pos_x = unit;
    (0..count)
        .map(|_| {
            let pos_y = if vertical_slack > 0 {
                rng.random_range(0..vertical_slack)
            } else {
                0
            };
            let origin = (pos_x, pos_y);
            pos_x = pos_x.saturating_add(unit.saturating_mul(2));
            origin
        })
        .collect()
}

fn background_color(rng: &mut impl Rng) -> Rgb<u8> {
    Rgb([
        rng.random_range(220..=255),
        rng.random_range(220..=255),
        rng.random_range(220..=255),
    ])
}

fn foreground_color(rng: &mut impl Rng) -> Rgb<u8> {
    Rgb([
        rng.random_range(0..128),
        rng.random_range(0..128),
        rng.random_range(0..128),
    ])
}

#[inline]
fn u32_to_f32(val: u32) -> f32 {
    f32::from(u16::try_from(val).unwrap_or(u16::MAX))
}

#[inline]
fn u32_to_i32(val: u32) -> i32 {
    i32::try_from(val).unwrap_or(i32::MAX)
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn f32_to_i32(val: f32) -> i32 {
    val.round().clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i32
}
