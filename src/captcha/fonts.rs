//! Captcha font resources.
//!
//! Fonts are addressed by a [`FontIndex`] in `1..=12` and fetched through a
//! [`FontSource`]. [`FontCache`] memoizes the raw bytes per index so repeated
//! generations skip the load. The cache is lock-free on reads; two threads
//! missing the same index may both load it, and the first insert wins.

use crate::config::{CaptchaError, GenerationKind, Result};
use papaya::HashMap;
use rand::Rng;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Number of packaged captcha fonts.
pub const FONT_COUNT: u8 = 12;

static EMBEDDED: [&[u8]; FONT_COUNT as usize] = [
    include_bytes!("../../assets/fonts/captcha_font_1.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_2.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_3.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_4.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_5.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_6.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_7.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_8.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_9.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_10.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_11.ttf"),
    include_bytes!("../../assets/fonts/captcha_font_12.ttf"),
];

/// One-based index of a packaged font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontIndex(u8);

impl FontIndex {
    /// Validates a font index.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Config` unless `index` is in `1..=12`.
    pub fn new(index: u8) -> Result<Self> {
        if (1..=FONT_COUNT).contains(&index) {
            Ok(Self(index))
        } else {
            Err(CaptchaError::Config(format!(
                "font index {index} is outside 1..={FONT_COUNT}"
            )))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Resource file name, e.g. `captcha_font_3.ttf`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("captcha_font_{}.ttf", self.0)
    }

    /// All indices in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=FONT_COUNT).map(Self)
    }

    pub(crate) fn random(rng: &mut impl Rng) -> Self {
        Self(rng.random_range(1..=FONT_COUNT))
    }
}

impl fmt::Display for FontIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Loader for raw font bytes.
pub trait FontSource: Send + Sync {
    /// Reads the complete font file for `index`.
    fn load(&self, index: FontIndex) -> io::Result<Arc<[u8]>>;
}

/// Fonts compiled into the binary from `assets/fonts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedFonts;

impl FontSource for EmbeddedFonts {
    fn load(&self, index: FontIndex) -> io::Result<Arc<[u8]>> {
        Ok(Arc::from(EMBEDDED[usize::from(index.get() - 1)]))
    }
}

/// Fonts read from `captcha_font_<n>.ttf` files in a directory.
#[derive(Debug, Clone)]
pub struct FontDirectory {
    root: PathBuf,
}

impl FontDirectory {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FontSource for FontDirectory {
    fn load(&self, index: FontIndex) -> io::Result<Arc<[u8]>> {
        let path = self.root.join(index.file_name());
        std::fs::read(&path).map(Arc::from).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to read {}: {e}", path.display()))
        })
    }
}

/// Shared, fill-once cache of font bytes keyed by index.
pub struct FontCache {
    source: Box<dyn FontSource>,
    entries: HashMap<FontIndex, Arc<[u8]>>,
}

impl FontCache {
    /// Creates an empty cache backed by `source`.
    #[must_use]
    pub fn new(source: impl FontSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::with_capacity(usize::from(FONT_COUNT)),
        }
    }

    /// Creates an empty cache over the embedded fonts.
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(EmbeddedFonts)
    }

    /// Process-wide cache over the embedded fonts, created on first use.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<FontCache>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::embedded())).clone()
    }

    /// Returns the bytes for `index`, loading and caching them on a miss.
    ///
    /// # Errors
    ///
    /// Returns `CaptchaError::Generation` with kind `FontLoad` if the source
    /// fails; the failure is not cached.
    pub fn get(&self, index: FontIndex) -> Result<Arc<[u8]>> {
        if let Some(bytes) = self.entries.pin().get(&index) {
            return Ok(bytes.clone());
        }

        debug!(font_index = %index, "Font cache miss");
        let bytes = self.source.load(index).map_err(|e| {
            warn!(font_index = %index, error = %e, "Failed to load font");
            CaptchaError::generation(GenerationKind::FontLoad, e)
        })?;

        let entries = self.entries.pin();
        if entries.try_insert(index, bytes).is_ok() {
            debug!(font_index = %index, "Font cached");
        }

        entries
            .get(&index)
            .cloned()
            .ok_or(CaptchaError::UnreachableState(
                "font cache entry missing after insert",
            ))
    }

    #[must_use]
    pub fn contains(&self, index: FontIndex) -> bool {
        self.entries.pin().contains_key(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
