use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::utils::url::UrlUtils;

/// Desktop and mobile players that can open a resolved playback URL through
/// their own URL scheme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExternalPlayer {
    Vlc,
    Iina,
    Outplayer,
}

impl ExternalPlayer {
    /// Deep link that hands `playback_url` to the player.
    ///
    /// IINA takes the URL as a query parameter and needs it encoded; VLC and
    /// Outplayer take it verbatim after the scheme.
    pub fn deep_link(self, playback_url: &str) -> String {
        match self {
            Self::Vlc => format!("vlc://{playback_url}"),
            Self::Iina => format!(
                "iina://weblink?url={}",
                UrlUtils::encode_component(playback_url)
            ),
            Self::Outplayer => format!("outplayer://{playback_url}"),
        }
    }
}
