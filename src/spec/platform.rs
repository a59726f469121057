use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A target environment a spec's file lists may vary by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    #[serde(alias = "macos")]
    Osx,
    Tvos,
    Watchos,
    Visionos,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Ios,
        Platform::Osx,
        Platform::Tvos,
        Platform::Watchos,
        Platform::Visionos,
    ];

    /// Key used for this platform in spec manifests
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Osx => "osx",
            Platform::Tvos => "tvos",
            Platform::Watchos => "watchos",
            Platform::Visionos => "visionos",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Ios => "iOS",
            Platform::Osx => "macOS",
            Platform::Tvos => "tvOS",
            Platform::Watchos => "watchOS",
            Platform::Visionos => "visionOS",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "osx" | "macos" => Ok(Platform::Osx),
            "tvos" => Ok(Platform::Tvos),
            "watchos" => Ok(Platform::Watchos),
            "visionos" => Ok(Platform::Visionos),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}
