use crate::common::{decode_image, init_tracing, packaged_font_dir};
use glyphgate::captcha::{CHARSET, FontDirectory};
use glyphgate::{
    Captcha, CaptchaError, CaptchaGenerator, FontCache, GenerationKind, GeneratorConfig,
    ImageType,
};
use std::collections::HashSet;
use std::sync::Arc;

fn assert_valid(captcha: &Captcha, config: &GeneratorConfig) {
    assert_eq!(captcha.code().len(), config.code_length);
    assert!(captcha.code().bytes().all(|b| CHARSET.contains(&b)));
    assert_eq!(captcha.image_type(), config.image_type);
    assert!(!captcha.image_bytes().is_empty());

    let img = decode_image(captcha);
    assert_eq!(img.width(), config.image_width);
    assert_eq!(img.height(), config.image_height);
}

#[test]
fn test_default_generator() {
    init_tracing();
    let generator = CaptchaGenerator::default_generator();
    let captcha = generator.generate().unwrap();

    assert_valid(&captcha, generator.config());
    assert!(std::ptr::eq(generator, CaptchaGenerator::default_generator()));
}

#[test]
fn test_custom_configurations() {
    init_tracing();
    let configs = [
        (8, ImageType::Bmp, 240, 40, 80),
        (6, ImageType::Jpg, 160, 48, 0),
        (1, ImageType::Gif, 30, 30, 5),
        (12, ImageType::Png, 300, 60, 200),
    ];

    for (code_length, image_type, width, height, lines) in configs {
        let generator = CaptchaGenerator::builder()
            .code_length(code_length)
            .image(Some(image_type), Some(width), Some(height))
            .mask_line_number(lines)
            .build()
            .unwrap();

        for _ in 0..3 {
            assert_valid(&generator.generate().unwrap(), generator.config());
        }
    }
}

#[test]
fn test_generators_are_independent() {
    let small = CaptchaGenerator::builder().code_length(3).build().unwrap();
    let large = CaptchaGenerator::builder()
        .code_length(9)
        .image_size(220, 50)
        .build()
        .unwrap();

    assert_eq!(small.config().code_length, 3);
    assert_eq!(small.config().image_width, 100);
    assert_eq!(large.config().code_length, 9);
    assert_eq!(large.config().image_width, 220);
    assert_eq!(CaptchaGenerator::default_generator().config().code_length, 4);
}

#[test]
fn test_codes_vary() {
    let generator = CaptchaGenerator::builder().code_length(8).build().unwrap();
    let codes: HashSet<String> = (0..20)
        .map(|_| generator.generate().unwrap().code().to_string())
        .collect();

    // 27^8 possible codes; twenty draws colliding down to a handful is not plausible
    assert!(codes.len() > 15);
}

#[test]
fn test_from_config() {
    let config = GeneratorConfig {
        image_type: ImageType::Jpeg,
        ..GeneratorConfig::default()
    };
    let generator = CaptchaGenerator::from_config(config).unwrap();
    assert_valid(&generator.generate().unwrap(), &config);

    let invalid = GeneratorConfig {
        image_height: 0,
        ..GeneratorConfig::default()
    };
    assert!(matches!(
        CaptchaGenerator::from_config(invalid),
        Err(CaptchaError::Config(_))
    ));
}

#[test]
fn test_font_directory_source() {
    init_tracing();
    let fonts = Arc::new(FontCache::new(FontDirectory::new(packaged_font_dir())));
    let generator = CaptchaGenerator::builder()
        .font_cache(fonts.clone())
        .build()
        .unwrap();

    for _ in 0..10 {
        assert_valid(&generator.generate().unwrap(), generator.config());
    }
    assert!(!fonts.is_empty());
}

#[test]
fn test_missing_font_directory() {
    let empty = tempfile::tempdir().unwrap();
    let generator = CaptchaGenerator::builder()
        .font_cache(Arc::new(FontCache::new(FontDirectory::new(empty.path()))))
        .build()
        .unwrap();

    let err = generator.generate().unwrap_err();
    assert_eq!(err.generation_kind(), Some(GenerationKind::FontLoad));
    assert!(std::error::Error::source(&err).is_some());
    assert!(generator.font_cache().is_empty());
}
