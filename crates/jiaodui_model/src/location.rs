//! Issue locations.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Key under which a location that is not a JSON object is kept.
pub const RAW_LOCATION_KEY: &str = "raw";

/// Payload field an issue points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadField {
    Content,
    Html,
    Title,
    FeaturedImage,
    Image,
}

impl PayloadField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadField::Content => "original_content",
            PayloadField::Html => "html_content",
            PayloadField::Title => "title",
            PayloadField::FeaturedImage => "featured_image",
            PayloadField::Image => "images",
        }
    }
}

/// Structured pointer to the place an issue refers to.
///
/// Rules fill the fields that make sense for them: text rules set `offset`
/// and `length` (in characters), markup rules add `tag`, image rules set
/// `resource`. Fields the AI pipeline sends that have no slot here, or whose
/// value does not fit the slot (a string or negative `offset`), are kept
/// verbatim in `extra`. A location that is not an object at all lands in
/// `extra` under [`RAW_LOCATION_KEY`]. Deserialization never fails on shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Character offset of the match start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Match length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Image id or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for IssueLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl IssueLocation {
    /// Location of a text span inside a payload field.
    pub fn span(field: PayloadField, offset: usize, length: usize) -> Self {
        Self {
            field: Some(field.as_str().to_string()),
            offset: Some(offset),
            length: Some(length),
            ..Default::default()
        }
    }

    /// Location of a markup tag inside `html_content`.
    pub fn tag(tag: impl Into<String>, offset: usize) -> Self {
        Self {
            field: Some(PayloadField::Html.as_str().to_string()),
            offset: Some(offset),
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    /// Location of an image resource.
    pub fn resource(field: PayloadField, resource: impl Into<String>) -> Self {
        Self {
            field: Some(field.as_str().to_string()),
            resource: Some(resource.into()),
            ..Default::default()
        }
    }

    /// Builds a location from arbitrary JSON.
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            Value::Null => return Self::default(),
            other => {
                return Self {
                    extra: BTreeMap::from([(RAW_LOCATION_KEY.to_string(), other)]),
                    ..Default::default()
                };
            }
        };

        Self {
            field: take_string(&mut map, "field"),
            offset: take_usize(&mut map, "offset"),
            length: take_usize(&mut map, "length"),
            tag: take_string(&mut map, "tag"),
            resource: take_string(&mut map, "resource"),
            extra: map.into_iter().collect(),
        }
    }

    /// Location of a whole payload field.
    pub fn field(field: PayloadField) -> Self {
        Self {
            field: Some(field.as_str().to_string()),
            ..Default::default()
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    let value = map.get(key)?.as_str()?.to_string();
    map.remove(key);
    Some(value)
}

fn take_usize(map: &mut Map<String, Value>, key: &str) -> Option<usize> {
    let value = usize::try_from(map.get(key)?.as_u64()?).ok()?;
    map.remove(key);
    Some(value)
}
