//! JSON layout document.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::layout::Layout;

/// A layout together with the seed that produced it.
#[derive(Serialize)]
pub struct LayoutDocument<'a> {
    /// RFC 3339 generation timestamp.
    pub generated_at: String,
    pub seed: u64,
    pub layout: &'a Layout,
}

impl<'a> LayoutDocument<'a> {
    pub fn new(layout: &'a Layout, seed: u64, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339(),
            seed,
            layout,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
