//! Image geometry and markup checks.

use std::sync::LazyLock;

use regex::Regex;

use jiaodui_model::{
    Category, ImageMetadata, IssueLocation, PayloadField, ProofreadingIssue, Severity,
};

use crate::{EvalContext, Rule, RuleError, RuleMeta};

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("Invalid img pattern"));

static ALT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\salt\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#)
        .expect("Invalid alt pattern")
});

fn image_location(field: PayloadField, image: &ImageMetadata) -> IssueLocation {
    match image.resource_name() {
        Some(name) => IssueLocation::resource(field, name),
        None => IssueLocation::field(field),
    }
}

/// The featured image must be clearly landscape.
///
/// Images without both dimensions are skipped.
pub struct FeaturedImageRatioRule {
    meta: RuleMeta,
    min_ratio: f64,
}

impl FeaturedImageRatioRule {
    pub fn new(min_ratio: f64) -> Self {
        let meta = RuleMeta::new("F-MEDIA-FEATURED-RATIO", Category::F)
            .with_subcategory("featured-image")
            .with_severity(Severity::Critical)
            .with_confidence(1.0)
            .with_priority(95)
            .with_blocks_publish(true)
            .with_description("Featured image aspect ratio too narrow");
        Self { meta, min_ratio }
    }
}

impl Rule for FeaturedImageRatioRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let Some(image) = &ctx.payload().featured_image else {
            return Ok(Vec::new());
        };
        let Some((width, height)) = image.dimensions() else {
            return Ok(Vec::new());
        };

        let ratio = f64::from(width) / f64::from(height);
        if ratio > self.min_ratio {
            return Ok(Vec::new());
        }

        let issue = self
            .meta
            .issue(format!(
                "封面图宽高比为 {ratio:.2}，需大于 {:.2}，请使用横版图片",
                self.min_ratio
            ))
            .with_suggestion(format!(
                "更换为宽高比大于 {:.2} 的横版封面图",
                self.min_ratio
            ))
            .with_location(image_location(PayloadField::FeaturedImage, image))
            .with_evidence(format!("{width}x{height} (ratio={ratio:.2})"));

        Ok(vec![issue])
    }

    fn definition(&self) -> String {
        format!("featured-ratio:<={}", self.min_ratio)
    }
}

/// Images narrower than the minimum width render blurry.
pub struct ImageWidthRule {
    meta: RuleMeta,
    min_width: u32,
}

impl ImageWidthRule {
    pub fn new(min_width: u32) -> Self {
        let meta = RuleMeta::new("F-MEDIA-IMAGE-WIDTH", Category::F)
            .with_subcategory("resolution")
            .with_severity(Severity::Warning)
            .with_confidence(1.0)
            .with_priority(60)
            .with_description("Image narrower than the minimum width");
        Self { meta, min_width }
    }

    fn check(&self, field: PayloadField, image: &ImageMetadata) -> Option<ProofreadingIssue> {
        let width = image.width.filter(|&width| width < self.min_width)?;
        let issue = self
            .meta
            .issue(format!(
                "图片宽度 {width}px 小于 {}px，可能显示模糊",
                self.min_width
            ))
            .with_location(image_location(field, image))
            .with_evidence(format!("width={width}"));
        Some(issue)
    }
}

impl Rule for ImageWidthRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let payload = ctx.payload();
        let featured = payload
            .featured_image
            .iter()
            .map(|image| (PayloadField::FeaturedImage, image));
        let body = payload
            .images
            .iter()
            .map(|image| (PayloadField::Image, image));

        Ok(featured
            .chain(body)
            .filter_map(|(field, image)| self.check(field, image))
            .collect())
    }

    fn definition(&self) -> String {
        format!("image-width:<{}", self.min_width)
    }
}

/// Every `<img>` needs a non-empty `alt` attribute.
pub struct ImageAltRule {
    meta: RuleMeta,
}

impl ImageAltRule {
    pub fn new() -> Self {
        let meta = RuleMeta::new("F-MEDIA-IMG-ALT", Category::F)
            .with_subcategory("accessibility")
            .with_severity(Severity::Warning)
            .with_confidence(0.95)
            .with_priority(40)
            .with_description("Image without alternative text");
        Self { meta }
    }

    fn has_alt(tag: &str) -> bool {
        ALT_ATTR.captures(tag).is_some_and(|caps| {
            (1..=3)
                .filter_map(|group| caps.get(group))
                .any(|value| !value.as_str().trim().is_empty())
        })
    }
}

impl Default for ImageAltRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ImageAltRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let Some(html) = ctx.html() else {
            return Ok(Vec::new());
        };

        let issues = IMG_TAG
            .find_iter(html.as_str())
            .filter(|tag| !Self::has_alt(tag.as_str()))
            .map(|tag| {
                self.meta
                    .issue("图片缺少替代文字（alt 属性）")
                    .with_location(IssueLocation::tag("img", html.char_offset(tag.start())))
                    .with_evidence(tag.as_str())
            })
            .collect();

        Ok(issues)
    }

    fn definition(&self) -> String {
        format!("img-alt:{}|{}", IMG_TAG.as_str(), ALT_ATTR.as_str())
    }
}
