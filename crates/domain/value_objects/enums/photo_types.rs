use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    #[default]
    Original,
    Generated,
    Send,
    Demo,
}

impl PhotoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoType::Original => "original",
            PhotoType::Generated => "generated",
            PhotoType::Send => "send",
            PhotoType::Demo => "demo",
        }
    }

    /// Case-insensitive, whitespace-tolerant lookup. `None` for values outside
    /// the vocabulary.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "original" => Some(PhotoType::Original),
            "generated" => Some(PhotoType::Generated),
            "send" => Some(PhotoType::Send),
            "demo" => Some(PhotoType::Demo),
            _ => None,
        }
    }

    /// Like [`PhotoType::parse`], falling back to `fallback` for unknown tags.
    pub fn normalize_or(raw: &str, fallback: PhotoType) -> Self {
        Self::parse(raw).unwrap_or(fallback)
    }
}

impl Display for PhotoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
