//! Evaluation context for caching derived views of a payload.
//!
//! Several rules read the same text; the context builds each view (char
//! index, sentence list) at most once per payload.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use jiaodui_model::{ArticlePayload, PayloadField};
use jiaodui_text::{IndexedText, Sentence, SentenceSplitter};

/// Payload field a text rule scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// `original_content`.
    #[default]
    Content,
    /// `html_content`.
    Html,
    Title,
}

impl Scope {
    pub fn field(&self) -> PayloadField {
        match self {
            Scope::Content => PayloadField::Content,
            Scope::Html => PayloadField::Html,
            Scope::Title => PayloadField::Title,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Content => "content",
            Scope::Html => "html",
            Scope::Title => "title",
        }
    }
}

/// Read-only view of one payload with lazily built text indexes.
pub struct EvalContext<'a> {
    payload: &'a ArticlePayload,
    content: OnceCell<IndexedText<'a>>,
    html: OnceCell<Option<IndexedText<'a>>>,
    title: OnceCell<IndexedText<'a>>,
    sentences: OnceCell<Vec<Sentence>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(payload: &'a ArticlePayload) -> Self {
        Self {
            payload,
            content: OnceCell::new(),
            html: OnceCell::new(),
            title: OnceCell::new(),
            sentences: OnceCell::new(),
        }
    }

    pub fn payload(&self) -> &'a ArticlePayload {
        self.payload
    }

    /// Plain text body.
    pub fn content(&self) -> &IndexedText<'a> {
        let payload = self.payload;
        self.content
            .get_or_init(|| IndexedText::new(&payload.original_content))
    }

    /// Markup body, or `None` when the payload has none.
    pub fn html(&self) -> Option<&IndexedText<'a>> {
        let payload = self.payload;
        self.html
            .get_or_init(|| payload.html().map(IndexedText::new))
            .as_ref()
    }

    pub fn title(&self) -> &IndexedText<'a> {
        let payload = self.payload;
        self.title.get_or_init(|| IndexedText::new(&payload.title))
    }

    /// Text of a scope, `None` when the field is absent.
    pub fn text(&self, scope: Scope) -> Option<&IndexedText<'a>> {
        match scope {
            Scope::Content => Some(self.content()),
            Scope::Html => self.html(),
            Scope::Title => Some(self.title()),
        }
    }

    /// Sentences of the plain text body.
    pub fn sentences(&self) -> &[Sentence] {
        let payload = self.payload;
        self.sentences
            .get_or_init(|| SentenceSplitter::split(&payload.original_content))
    }
}
