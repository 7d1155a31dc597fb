//! Shared slide state.
//!
//! One writer at a time, many concurrent readers. Readers always get a full
//! copy of the latest slide, never a partially written one.

use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock};

use super::types::SlideData;

#[derive(Debug, Default)]
struct Current {
    slide: SlideData,
    updated_at: Option<DateTime<Utc>>,
}

/// Holds the slide currently on screen. Last write wins.
#[derive(Debug, Default)]
pub struct SlideState {
    current: RwLock<Current>,
}

impl SlideState {
    /// Creates a state cell holding the empty slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current slide unconditionally.
    pub fn set(&self, slide: SlideData) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.slide = slide;
        current.updated_at = Some(Utc::now());
    }

    /// Returns a copy of the current slide.
    pub fn get(&self) -> SlideData {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .slide
            .clone()
    }

    /// When the slide was last replaced. `None` before the first update.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .updated_at
    }
}
