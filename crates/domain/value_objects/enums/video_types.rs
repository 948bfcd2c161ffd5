use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    Send,
    Demo,
}

impl VideoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::Send => "send",
            VideoType::Demo => "demo",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "send" => Some(VideoType::Send),
            "demo" => Some(VideoType::Demo),
            _ => None,
        }
    }

    /// Unknown or empty tags become [`VideoType::Send`].
    pub fn normalize(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

impl Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
