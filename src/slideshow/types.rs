//! Data types for the shared slide.
//!
//! Defines the snapshot pushed to every viewer and accepted from the
//! producer over HTTP.

use serde::{Deserialize, Serialize};

/// A single text overlay positioned on top of the slide image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    /// Text to render.
    pub content: String,

    /// Horizontal position in pixels.
    pub x: i64,

    /// Vertical position in pixels.
    pub y: i64,

    /// Font size in pixels. Viewers pick their own default when absent.
    #[serde(rename = "fontSize", default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i64>,

    /// Font family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// The complete state of the slide currently on screen.
///
/// Every field is required on input. The zero value (empty strings, no
/// overlays, zero duration) is what viewers see before the first update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideData {
    /// Image URL or base64-encoded image data.
    pub image: String,

    /// Text overlays, drawn in order.
    pub text: Vec<TextElement>,

    /// CSS color applied to all overlays.
    #[serde(rename = "text-color")]
    pub text_color: String,

    /// Name of the transition effect (e.g. "fade", "pixel").
    #[serde(rename = "transition-effect")]
    pub transition_effect: String,

    /// Transition duration, in the unit the viewer expects.
    #[serde(rename = "transition-time")]
    pub transition_time: i64,
}

impl SlideData {
    /// Parses a slide from a raw JSON request body.
    pub fn from_json(body: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_slide_is_empty() {
        let slide = SlideData::default();
        let value = serde_json::to_value(&slide).unwrap();
        assert_eq!(
            value,
            json!({
                "image": "",
                "text": [],
                "text-color": "",
                "transition-effect": "",
                "transition-time": 0,
            })
        );
    }

    #[test]
    fn test_parse_uses_hyphenated_keys() {
        let body = br##"{
            "image": "a.jpg",
            "text": [{"content": "Hello", "x": 10, "y": 20, "fontSize": 32}],
            "text-color": "#fff",
            "transition-effect": "fade",
            "transition-time": 500
        }"##;

        let slide = SlideData::from_json(body).unwrap();
        assert_eq!(slide.image, "a.jpg");
        assert_eq!(slide.text_color, "#fff");
        assert_eq!(slide.transition_effect, "fade");
        assert_eq!(slide.transition_time, 500);
        assert_eq!(slide.text.len(), 1);
        assert_eq!(slide.text[0].font_size, Some(32));
        assert_eq!(slide.text[0].font, None);
    }

    #[test]
    fn test_optional_font_fields_are_omitted() {
        let element = TextElement {
            content: "Hi".to_string(),
            x: 1,
            y: 2,
            font_size: None,
            font: None,
        };
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value, json!({"content": "Hi", "x": 1, "y": 2}));
    }

    #[test]
    fn test_coordinates_beyond_32_bits_are_accepted() {
        let body = br#"{"content": "far", "x": 4294967296, "y": -4294967296, "fontSize": 3000000000}"#;
        let element: TextElement = serde_json::from_slice(body).unwrap();
        assert_eq!(element.x, 4_294_967_296);
        assert_eq!(element.y, -4_294_967_296);
        assert_eq!(element.font_size, Some(3_000_000_000));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let body = br##"{"image": "a.jpg", "text": [], "text-color": "#fff", "transition-effect": "fade"}"##;
        assert!(SlideData::from_json(body).is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let body = br##"{"image": "a.jpg", "text": "nope", "text-color": "#fff", "transition-effect": "fade", "transition-time": 5}"##;
        assert!(SlideData::from_json(body).is_err());
    }
}
