//! Byte/character offset conversion.
//!
//! Regex matches report byte offsets, while issue locations and evidence
//! windows are expressed in characters so that consumers outside Rust can
//! index the same string.

/// A string with a precomputed table of character start offsets.
#[derive(Debug, Clone)]
pub struct IndexedText<'a> {
    text: &'a str,
    /// Byte offset of every character, followed by `text.len()`.
    starts: Vec<usize>,
}

impl<'a> IndexedText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        starts.push(text.len());
        Self { text, starts }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn char_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Converts a byte offset to a character offset.
    ///
    /// Offsets inside a multi-byte character map to the character that
    /// contains them.
    pub fn char_offset(&self, byte: usize) -> usize {
        let idx = self.starts.partition_point(|&start| start <= byte);
        idx.saturating_sub(1).min(self.char_count())
    }

    /// Converts a character offset to a byte offset, clamping to the end.
    pub fn byte_offset(&self, char_idx: usize) -> usize {
        self.starts[char_idx.min(self.char_count())]
    }

    /// Slices by character range, clamping both ends.
    pub fn slice_chars(&self, start: usize, end: usize) -> &'a str {
        let start = self.byte_offset(start);
        let end = self.byte_offset(end).max(start);
        &self.text[start..end]
    }

    /// Text around a byte range, widened by `radius` characters on each side.
    pub fn window(&self, byte_start: usize, byte_end: usize, radius: usize) -> &'a str {
        let start = self.char_offset(byte_start).saturating_sub(radius);
        let end = self.char_offset(byte_end).saturating_add(radius);
        self.slice_chars(start, end)
    }

    /// Text from `byte_start` through `byte_end` plus `trailing` more characters.
    pub fn extend_after(&self, byte_start: usize, byte_end: usize, trailing: usize) -> &'a str {
        let start = self.char_offset(byte_start);
        let end = self.char_offset(byte_end).saturating_add(trailing);
        self.slice_chars(start, end)
    }

    /// Character before the given byte offset.
    pub fn char_before(&self, byte: usize) -> Option<char> {
        self.text[..byte.min(self.text.len())].chars().next_back()
    }

    /// Character starting at the given byte offset.
    pub fn char_at(&self, byte: usize) -> Option<char> {
        self.text.get(byte..).and_then(|rest| rest.chars().next())
    }
}
