//! Hand-written rules that do not fit a single regex.

mod brackets;
mod heading;
mod image;
mod punctuation;
mod sentence;
mod title;

pub use brackets::UnpairedMarksRule;
pub use heading::{HeadingLevelRule, HeadingOrderRule};
pub use image::{FeaturedImageRatioRule, ImageAltRule, ImageWidthRule};
pub use punctuation::HalfwidthPunctuationRule;
pub use sentence::SentenceLengthRule;
pub use title::TitleLengthRule;
