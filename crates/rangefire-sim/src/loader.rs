//! Asset loading against an ordered list of fallback sources.
//!
//! The loader never performs I/O. It tells the caller which source to request
//! next and consumes the host's success/failure reports. Once every source has
//! failed it settles on `Unavailable` and stops asking.

use rangefire_core::enums::LoadStatus;

#[derive(Debug, Clone)]
pub struct FallbackLoader {
    sources: Vec<String>,
    status: LoadStatus,
    /// Index of the source requested or loaded.
    current: usize,
}

impl FallbackLoader {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            status: LoadStatus::Idle,
            current: 0,
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    /// The source currently requested or loaded.
    pub fn current_source(&self) -> Option<&str> {
        match self.status {
            LoadStatus::Loading | LoadStatus::Ready => {
                self.sources.get(self.current).map(String::as_str)
            }
            LoadStatus::Idle | LoadStatus::Unavailable => None,
        }
    }

    /// Start loading. Returns the first source to request, or `None` if
    /// loading already started or there is nothing to try.
    pub fn begin(&mut self) -> Option<String> {
        if self.status != LoadStatus::Idle {
            return None;
        }
        self.current = 0;
        self.request_current()
    }

    /// Record a successful load. Reports for any other source are stale and
    /// ignored. Returns whether the report was accepted.
    pub fn loaded(&mut self, source: &str) -> bool {
        if !self.is_pending(source) {
            return false;
        }
        self.status = LoadStatus::Ready;
        true
    }

    /// Record a failed load and move to the next source.
    /// Returns the next source to request, or `None` if the report was stale
    /// or the list is exhausted.
    pub fn failed(&mut self, source: &str) -> Option<String> {
        if !self.is_pending(source) {
            return None;
        }
        self.current += 1;
        self.request_current()
    }

    /// Forget everything and return to `Idle`.
    pub fn reset(&mut self) {
        self.status = LoadStatus::Idle;
        self.current = 0;
    }

    /// Whether `source` is the request still awaiting a report.
    /// Reports for anything else are stale.
    pub fn is_pending(&self, source: &str) -> bool {
        self.status == LoadStatus::Loading
            && self.sources.get(self.current).is_some_and(|s| s == source)
    }

    fn request_current(&mut self) -> Option<String> {
        match self.sources.get(self.current) {
            Some(source) => {
                self.status = LoadStatus::Loading;
                Some(source.clone())
            }
            None => {
                self.status = LoadStatus::Unavailable;
                None
            }
        }
    }
}
