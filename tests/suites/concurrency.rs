use crate::common::init_tracing;
use glyphgate::captcha::{EmbeddedFonts, FontSource};
use glyphgate::{CaptchaGenerator, FontCache, FontIndex, ImageType};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 10;

#[test]
fn test_concurrent_generation() {
    init_tracing();
    let fonts = Arc::new(FontCache::embedded());
    let generator = Arc::new(
        CaptchaGenerator::builder()
            .image_type(ImageType::Png)
            .font_cache(fonts.clone())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let generator = generator.clone();
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|_| generator.generate().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for captcha in handle.join().unwrap() {
            assert_eq!(captcha.code().len(), 4);
            assert!(!captcha.image_bytes().is_empty());
        }
    }

    for index in FontIndex::all() {
        if fonts.contains(index) {
            assert_eq!(fonts.get(index).unwrap(), EmbeddedFonts.load(index).unwrap());
        }
    }
}

#[test]
fn test_concurrent_cache_fill_every_index() {
    let fonts = FontCache::embedded();

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for index in FontIndex::all() {
                    fonts.get(index).unwrap();
                }
            });
        }
    });

    assert_eq!(fonts.len(), FontIndex::all().count());
    for index in FontIndex::all() {
        assert_eq!(fonts.get(index).unwrap(), EmbeddedFonts.load(index).unwrap());
    }
}

#[test]
fn test_default_generator_shared_across_threads() {
    let addresses: Vec<usize> = (0..THREADS)
        .map(|_| {
            thread::spawn(|| {
                let generator = CaptchaGenerator::default_generator();
                generator.generate().unwrap();
                std::ptr::from_ref(generator) as usize
            })
        })
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}
