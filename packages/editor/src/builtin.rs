//! # Builtin Block Types
//!
//! Definitions for the block catalog that ships with the editor, plus typed
//! content records for the types whose shape the editor itself relies on.
//!
//! Typed records keep every key they do not know about in `extra`, so
//! decoding and re-encoding content never loses data.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::block::DataMap;
use crate::registry::{BlockCategory, BlockTypeDefinition, RegistryError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: DataMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(flatten)]
    pub extra: DataMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: DataMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryContent {
    pub images: Vec<GalleryImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: DataMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_text: Option<String>,
    #[serde(flatten)]
    pub extra: DataMap,
}

/// Block content keyed by type tag.
///
/// `Unknown` covers every type without a typed record, including tags the
/// registry has never heard of. Its content is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Hero(HeroContent),
    Text(TextContent),
    Image(ImageContent),
    Gallery(GalleryContent),
    Form(FormContent),
    Unknown { block_type: String, content: DataMap },
}

impl BlockData {
    pub fn decode(block_type: &str, content: &DataMap) -> Result<Self, RegistryError> {
        let value = Value::Object(content.clone());
        let invalid = |e: serde_json::Error| RegistryError::InvalidContent {
            block_type: block_type.to_string(),
            message: e.to_string(),
        };

        Ok(match block_type {
            "hero" => BlockData::Hero(serde_json::from_value(value).map_err(invalid)?),
            "text" => BlockData::Text(serde_json::from_value(value).map_err(invalid)?),
            "image" => BlockData::Image(serde_json::from_value(value).map_err(invalid)?),
            "gallery" => BlockData::Gallery(serde_json::from_value(value).map_err(invalid)?),
            "form" | "contact-form" => {
                BlockData::Form(serde_json::from_value(value).map_err(invalid)?)
            }
            other => BlockData::Unknown {
                block_type: other.to_string(),
                content: content.clone(),
            },
        })
    }

    pub fn type_tag(&self) -> &str {
        match self {
            BlockData::Hero(_) => "hero",
            BlockData::Text(_) => "text",
            BlockData::Image(_) => "image",
            BlockData::Gallery(_) => "gallery",
            BlockData::Form(_) => "form",
            BlockData::Unknown { block_type, .. } => block_type,
        }
    }

    /// Encode back into an opaque content map
    pub fn into_content(self) -> Result<DataMap, serde_json::Error> {
        let value = match self {
            BlockData::Hero(c) => serde_json::to_value(c)?,
            BlockData::Text(c) => serde_json::to_value(c)?,
            BlockData::Image(c) => serde_json::to_value(c)?,
            BlockData::Gallery(c) => serde_json::to_value(c)?,
            BlockData::Form(c) => serde_json::to_value(c)?,
            BlockData::Unknown { content, .. } => return Ok(content),
        };
        Ok(match value {
            Value::Object(map) => map,
            _ => DataMap::new(),
        })
    }
}

fn object(value: Value) -> DataMap {
    match value {
        Value::Object(map) => map,
        _ => DataMap::new(),
    }
}

/// Layout every builtin block starts with
pub fn default_layout() -> DataMap {
    object(json!({
        "width": "container",
        "padding": "default",
        "margin": "default",
        "background": null,
        "alignment": "left",
    }))
}

fn define(block_type: &str, name: &str, category: BlockCategory, description: &str) -> BlockTypeDefinition {
    BlockTypeDefinition::new(block_type, name, category)
        .with_description(description)
        .with_default_layout(default_layout())
}

/// The builtin block catalog
pub fn builtin_definitions() -> Vec<BlockTypeDefinition> {
    vec![
        define("hero", "Hero", BlockCategory::Layout, "A large banner with a headline, subheadline, and call-to-action.")
            .with_default_content(object(json!({
                "headline": "Welcome to My Portfolio",
                "subheadline": "I am a creative professional based in San Francisco.",
                "cta_text": "View My Work",
                "cta_link": "#projects",
            })))
            .with_default_settings(object(json!({
                "alignment": "center",
                "background": "solid",
                "height": "medium",
                "overlay": false,
            }))),
        define("text", "Text Content", BlockCategory::Content, "A rich text block for paragraphs and headings.")
            .with_default_content(object(json!({ "text": "Start typing your content here..." })))
            .with_default_settings(object(json!({ "max_width": "800px", "text_align": "left" })))
            .with_required_fields(&["text"]),
        define("image", "Image", BlockCategory::Media, "Display a single image with optional caption.")
            .with_default_content(object(json!({ "image_url": "", "alt_text": "Placeholder image" })))
            .with_default_settings(object(json!({ "width": "medium", "alignment": "center" }))),
        define("gallery", "Gallery", BlockCategory::Media, "A grid or carousel of images.")
            .with_default_content(object(json!({ "images": [] })))
            .with_default_settings(object(json!({ "layout": "grid", "columns": 3, "gap": "default" })))
            .with_required_fields(&["images"]),
        define("video", "Video", BlockCategory::Media, "Embed a video from YouTube, Vimeo, or a direct link.")
            .with_default_content(object(json!({ "video_url": "", "autoplay": false, "controls": true })))
            .with_default_settings(object(json!({ "aspect_ratio": "16:9", "width": "full" }))),
        define("form", "Contact Form", BlockCategory::Interactive, "A form for visitors to get in touch with you.")
            .with_default_content(object(json!({
                "title": "Get in Touch",
                "description": "Send me a message and I will get back to you as soon as possible.",
                "fields": [
                    { "name": "name", "type": "text", "label": "Name", "required": true },
                    { "name": "email", "type": "email", "label": "Email", "required": true },
                    { "name": "message", "type": "textarea", "label": "Message", "required": true },
                ],
                "submit_text": "Send Message",
            })))
            .with_default_settings(object(json!({ "layout": "default" }))),
        define("features", "Features", BlockCategory::Content, "A grid of features or services.")
            .with_default_content(object(json!({ "title": "What I Do", "features": [] })))
            .with_default_settings(object(json!({ "layout": "grid", "columns": 3, "show_icon": true }))),
        define("header", "Header", BlockCategory::Layout, "Site navigation and logo.")
            .with_default_content(object(json!({
                "logo_text": "My Portfolio",
                "links": [
                    { "label": "Home", "url": "/" },
                    { "label": "My Work", "url": "/work" },
                    { "label": "Contact", "url": "/contact" },
                ],
            })))
            .with_default_settings(object(json!({ "layout": "simple", "sticky": true }))),
        define("footer", "Footer", BlockCategory::Layout, "Site footer with copyright and social links.")
            .with_default_content(object(json!({ "copyright_text": "All rights reserved.", "social_links": [] })))
            .with_default_settings(object(json!({ "layout": "simple" }))),
        define("skills", "Skills", BlockCategory::Portfolio, "Showcase your skills and expertise.")
            .with_default_content(object(json!({ "skills": [] })))
            .with_default_settings(object(json!({ "layout": "grid", "show_level": true }))),
        define("stats", "Stats", BlockCategory::Portfolio, "Display key statistics or numbers.")
            .with_default_content(object(json!({ "stats": [] })))
            .with_default_settings(object(json!({ "layout": "grid", "columns": 3 }))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_extra_keys() {
        let content = object(json!({
            "headline": "Hi",
            "show_scroll_indicator": true,
            "custom": { "x": 1 },
        }));

        let data = BlockData::decode("hero", &content).unwrap();
        match &data {
            BlockData::Hero(hero) => {
                assert_eq!(hero.headline.as_deref(), Some("Hi"));
                assert_eq!(hero.extra["custom"], json!({ "x": 1 }));
            }
            other => panic!("Expected hero, got {:?}", other),
        }

        assert_eq!(data.into_content().unwrap(), content);
    }

    #[test]
    fn test_decode_gallery_images() {
        let content = object(json!({
            "images": [{ "id": "1", "url": "https://example.com/a.jpg", "alt": "A" }]
        }));

        match BlockData::decode("gallery", &content).unwrap() {
            BlockData::Gallery(gallery) => {
                assert_eq!(gallery.images.len(), 1);
                assert_eq!(gallery.images[0].alt.as_deref(), Some("A"));
            }
            other => panic!("Expected gallery, got {:?}", other),
        }
    }

    #[test]
    fn test_untyped_tags_decode_as_unknown() {
        let content = object(json!({ "logo_text": "Me" }));
        let data = BlockData::decode("header", &content).unwrap();

        assert_eq!(data.type_tag(), "header");
        assert!(matches!(data, BlockData::Unknown { .. }));
    }

    #[test]
    fn test_builtin_defaults_validate() {
        for definition in builtin_definitions() {
            assert!(
                BlockData::decode(&definition.block_type, &definition.default_content).is_ok(),
                "default content of {} should decode",
                definition.block_type
            );
            for field in &definition.required_fields {
                assert!(definition.default_content.contains_key(field));
            }
        }
    }
}
