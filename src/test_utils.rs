//! Test utilities and shared fixtures.
//!
//! Font sources with scripted behavior for exercising the cache and the
//! generator without touching the packaged fonts.

use crate::captcha::{FontIndex, FontSource};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves the same bytes for every index and counts loads.
pub struct CountingFontSource {
    bytes: Arc<[u8]>,
    loads: Arc<AtomicUsize>,
}

impl CountingFontSource {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the load counter, usable after the source moves into a cache.
    #[must_use]
    pub fn loads(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }
}

impl FontSource for CountingFontSource {
    fn load(&self, _index: FontIndex) -> io::Result<Arc<[u8]>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::from(&self.bytes[..]))
    }
}

/// Always fails with `NotFound`.
pub struct FailingFontSource;

impl FontSource for FailingFontSource {
    fn load(&self, index: FontIndex) -> io::Result<Arc<[u8]>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no font {index}"),
        ))
    }
}

/// Fails the first `failures` loads, then serves `bytes`.
pub struct FlakyFontSource {
    remaining_failures: AtomicUsize,
    bytes: Arc<[u8]>,
}

impl FlakyFontSource {
    #[must_use]
    pub fn new(failures: usize, bytes: Vec<u8>) -> Self {
        Self {
            remaining_failures: AtomicUsize::new(failures),
            bytes: Arc::from(bytes),
        }
    }
}

impl FontSource for FlakyFontSource {
    fn load(&self, _index: FontIndex) -> io::Result<Arc<[u8]>> {
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(io::Error::new(io::ErrorKind::Interrupted, "transient read failure"))
        } else {
            Ok(self.bytes.clone())
        }
    }
}
