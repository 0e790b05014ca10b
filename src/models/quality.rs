use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Video quality label of a stream variant.
///
/// Variants are declared in ascending resolution order, so the derived
/// `Ord` is the resolution order with `Unknown` lowest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum QualityLabel {
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
    #[serde(rename = "360")]
    #[strum(serialize = "360")]
    P360,
    #[serde(rename = "480")]
    #[strum(serialize = "480")]
    P480,
    #[serde(rename = "720")]
    #[strum(serialize = "720")]
    P720,
    #[serde(rename = "1080")]
    #[strum(serialize = "1080")]
    P1080,
    #[serde(rename = "4k")]
    #[strum(to_string = "4k", serialize = "4K")]
    P4k,
}

impl QualityLabel {
    /// Every label in ascending order, `Unknown` first.
    pub fn all() -> Vec<QualityLabel> {
        Self::iter().collect()
    }

    /// Labels shown in the quality menu whether or not a source provides them.
    pub fn is_always_visible(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Map a vertical resolution to the nearest label at or below it.
    pub fn from_height(height: u32) -> Self {
        match height {
            h if h >= 2160 => Self::P4k,
            h if h >= 1080 => Self::P1080,
            h if h >= 720 => Self::P720,
            h if h >= 480 => Self::P480,
            h if h >= 360 => Self::P360,
            _ => Self::Unknown,
        }
    }

    /// Human readable name, e.g. `1080p` or `4K`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::P360 => "360p",
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::P4k => "4K",
        }
    }
}
