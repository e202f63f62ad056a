//! Configuration management.
//!
//! Generator parameters with defaults, environment loading, and the crate
//! error taxonomy.

mod error;
mod settings;

pub use error::{BoxedCause, CaptchaError, GenerationKind, Result};
pub use settings::{
    DEFAULT_CODE_LENGTH, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_MASK_LINE_NUMBER,
    GeneratorConfig, Settings,
};
