use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Label shown when a title has no known streaming availability
pub const PURCHASE_FALLBACK: &str = "Buy movie online";

/// Streaming services tracked by the local availability dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Netflix,
    Hulu,
    #[serde(rename = "Prime Video")]
    PrimeVideo,
    #[serde(rename = "Disney+")]
    DisneyPlus,
}

impl Platform {
    /// Column order of the dataset, which is also the display order
    pub const ALL: [Platform; 4] = [
        Platform::Netflix,
        Platform::Hulu,
        Platform::PrimeVideo,
        Platform::DisneyPlus,
    ];

    /// CSV header / display name
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Netflix => "Netflix",
            Platform::Hulu => "Hulu",
            Platform::PrimeVideo => "Prime Video",
            Platform::DisneyPlus => "Disney+",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of an availability lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereToWatch {
    /// At least one tracked service carries the title
    Streaming(Vec<Platform>),
    /// Unknown title, or no active flag
    Purchase,
}

impl WhereToWatch {
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            WhereToWatch::Streaming(platforms) => platforms.iter().map(Platform::name).collect(),
            WhereToWatch::Purchase => vec![PURCHASE_FALLBACK],
        }
    }
}

impl Display for WhereToWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labels().join(", "))
    }
}

impl Serialize for WhereToWatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labels().serialize(serializer)
    }
}
