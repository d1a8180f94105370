mod charclass;
mod indexed;
mod splitter;

pub use charclass::{is_cjk, is_digit};
pub use indexed::IndexedText;
pub use splitter::{Sentence, SentenceSplitter};
