//! Stream quality selection
//!
//! - `store`: the persisted quality preference state
//! - `selector`: automatic/manual selection rules and the quality menu
//! - `hls`: quality ladder extraction from HLS master playlists

pub mod hls;
pub mod selector;
pub mod store;

pub use hls::{MasterVariant, parse_master_variants, qualities_from_master_playlist};
pub use selector::{
    PlaybackControl, QualityOption, QualitySelector, preferred_quality, supports_automatic,
    visible_qualities,
};
pub use store::{PreferenceStore, QualityPreferences};
