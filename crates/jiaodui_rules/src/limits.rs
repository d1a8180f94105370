//! Thresholds for the procedural rules.

use serde::{Deserialize, Serialize};

/// Numeric limits, configurable through the `limits` config key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleLimits {
    /// Longest sentence, in characters, before `D-STYLE-SENTENCE-LENGTH` fires.
    pub sentence_max_chars: usize,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    /// Featured images with `width / height` at or below this ratio block publishing.
    pub featured_min_ratio: f64,
    /// Minimum known image width in pixels.
    pub image_min_width: u32,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            sentence_max_chars: 120,
            title_min_chars: 5,
            title_max_chars: 64,
            featured_min_ratio: 1.2,
            image_min_width: 600,
        }
    }
}
