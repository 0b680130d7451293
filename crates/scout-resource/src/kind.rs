//! Resource types.

use std::{fmt, str};

use serde::{Deserialize, Serialize};

/// The type of a recommended resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Articles and papers.
    Text,
    /// Videos.
    Video,
    /// Code repositories.
    Code,
}

impl ResourceKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Text, Self::Video, Self::Code];

    /// Returns the lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Video => "video",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "video" => Ok(Self::Video),
            "code" => Ok(Self::Code),
            other => Err(format!("unknown resource type '{other}'")),
        }
    }
}
