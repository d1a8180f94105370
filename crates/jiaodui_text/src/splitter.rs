use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// A sentence unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// The text content of the sentence.
    pub text: String,
    /// The absolute byte range of the sentence in the original text (including trailing punctuation).
    pub span: Range<usize>,
}

impl Sentence {
    /// Length in user-perceived characters, ignoring surrounding whitespace.
    pub fn display_len(&self) -> usize {
        self.text.trim().graphemes(true).count()
    }
}

/// Splits Chinese prose into sentences.
pub struct SentenceSplitter;

impl SentenceSplitter {
    /// Splits text into sentences.
    ///
    /// - `。`, `！`, `？` always end a sentence.
    /// - `!`, `?`, `.` end a sentence only when followed by whitespace or EOF.
    /// - A newline is a paragraph break and always ends a sentence.
    /// - Closing quotes and brackets right after the terminator stay with the
    ///   sentence they close (`他说：“好。”`).
    pub fn split(text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            let is_sentence_end = match c {
                '。' | '！' | '？' | '\n' => true,
                '!' | '?' | '.' => match chars.peek() {
                    Some((_, next_c)) => next_c.is_whitespace(),
                    None => true,
                },
                _ => false,
            };

            if !is_sentence_end {
                continue;
            }

            let mut end = idx + c.len_utf8();
            if c != '\n' {
                while let Some(&(next_idx, next_c)) = chars.peek() {
                    if matches!(next_c, '”' | '’' | '）' | '」' | '』' | '》' | ')') {
                        end = next_idx + next_c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
            }

            Self::push(&mut sentences, text, start..end);
            start = end;
        }

        if start < text.len() {
            Self::push(&mut sentences, text, start..text.len());
        }

        sentences
    }

    fn push(sentences: &mut Vec<Sentence>, text: &str, span: Range<usize>) {
        let sentence_text = &text[span.clone()];
        // Avoid empty sentences (e.g., consecutive punctuation or blank lines)
        if !sentence_text.trim().is_empty() {
            sentences.push(Sentence {
                text: sentence_text.to_string(),
                span,
            });
        }
    }
}
