//! Detected text regions returned by the recognition service

use serde::{Deserialize, Deserializer, Serialize};

/// A point in frame-space pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// One recognized span of text with its position and translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    /// Identifier assigned by the service (string or number on the wire)
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Chinese characters as recognized
    #[serde(rename = "characters")]
    pub source_text: String,
    /// Pinyin transliteration
    #[serde(rename = "pinyin", default)]
    pub transliteration: String,
    /// English translation
    #[serde(default)]
    pub translation: String,
    /// Polygon of the region; the first vertex is the top-left corner
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

impl DetectedRegion {
    /// The corner labels are anchored at
    pub fn reference_corner(&self) -> Option<Vertex> {
        self.vertices.first().copied()
    }

    /// Whether the region can be positioned at all
    pub fn is_positionable(&self) -> bool {
        !self.vertices.is_empty()
    }
}

/// Join the characters of all regions, in order, as the text stored with a
/// saved scan.
pub fn joined_source_text(regions: &[DetectedRegion]) -> String {
    regions
        .iter()
        .map(|r| r.source_text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
