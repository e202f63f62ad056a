use glyphgate::Captcha;
use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Directory holding the packaged `captcha_font_<n>.ttf` files.
pub fn packaged_font_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

pub fn decode_image(captcha: &Captcha) -> image::DynamicImage {
    image::load_from_memory(captcha.image_bytes()).expect("captcha image should decode")
}
