//! Article payload handed to the rule engine.

use serde::{Deserialize, Serialize};

/// Image reference with optional pixel dimensions.
///
/// Either dimension may be unknown. Geometry checks skip images whose
/// dimensions are missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageMetadata {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Both dimensions, when known. A zero height counts as unknown.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// `width / height`, when both are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.dimensions().map(|(w, h)| f64::from(w) / f64::from(h))
    }

    /// Identifier used in issue locations: id, then path.
    pub fn resource_name(&self) -> Option<&str> {
        self.id.as_deref().or(self.path.as_deref())
    }
}

/// One article to proofread. Never modified during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,

    /// Plain text body.
    pub original_content: String,

    /// Raw markup body, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageMetadata>,

    /// Other images referenced by the article body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageMetadata>,
}

impl ArticlePayload {
    /// Creates a payload with only a plain text body.
    pub fn new(original_content: impl Into<String>) -> Self {
        Self {
            original_content: original_content.into(),
            ..Default::default()
        }
    }

    pub fn with_article_id(mut self, article_id: impl Into<String>) -> Self {
        self.article_id = Some(article_id.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_content = Some(html.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_featured_image(mut self, image: ImageMetadata) -> Self {
        self.featured_image = Some(image);
        self
    }

    pub fn with_image(mut self, image: ImageMetadata) -> Self {
        self.images.push(image);
        self
    }

    /// Markup body, treating an empty string as absent.
    pub fn html(&self) -> Option<&str> {
        self.html_content.as_deref().filter(|html| !html.is_empty())
    }
}
