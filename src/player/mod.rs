//! Playback session state
//!
//! `PlayerSession` tracks what is loaded and which quality plays. For HLS it
//! also mirrors the adaptive engine: the levels it reported and whether it
//! is free to pick levels itself.

use tracing::{debug, info};

use crate::models::{QualityLabel, SourceDescriptor, SourceKind};
use crate::proxy::ProxyResolver;
use crate::quality::{PlaybackControl, QualityPreferences, preferred_quality};

#[derive(Debug, Clone, Default)]
pub struct PlayerSession {
    source: Option<SourceDescriptor>,
    available: Vec<QualityLabel>,
    current: Option<QualityLabel>,
    engine_automatic: bool,
    // Preferences seen at load time; HLS levels arrive after the load.
    load_preferences: QualityPreferences,
}

impl PlayerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the adaptive engine currently picks HLS levels on its own.
    pub fn engine_automatic(&self) -> bool {
        self.engine_automatic
    }

    /// Load `source` and pick its starting quality from `preferences`.
    pub fn load_source(&mut self, source: SourceDescriptor, preferences: &QualityPreferences) {
        self.available = source.available_qualities();
        self.load_preferences = *preferences;
        self.engine_automatic = source.is_hls() && preferences.automatic_quality;
        self.current = preferred_quality(&self.available, preferences);

        info!(
            kind = ?source.kind(),
            quality = ?self.current,
            engine_automatic = self.engine_automatic,
            "Source loaded"
        );
        self.source = Some(source);
    }

    /// Record the levels the adaptive engine found in the manifest.
    ///
    /// With the engine in charge no level is pinned; otherwise the
    /// remembered preference pins one now.
    pub fn set_hls_levels(&mut self, levels: impl IntoIterator<Item = QualityLabel>) {
        if self.source_kind() != Some(SourceKind::Hls) {
            debug!("Ignoring HLS levels for a non-HLS source");
            return;
        }

        let mut levels: Vec<QualityLabel> = levels.into_iter().collect();
        levels.sort();
        levels.dedup();
        self.available = levels;

        self.current = if self.engine_automatic {
            None
        } else {
            preferred_quality(&self.available, &self.load_preferences)
        };
        debug!(levels = ?self.available, quality = ?self.current, "HLS levels updated");
    }

    /// Playback URL for the current source and quality.
    pub fn resolved_url(&self, resolver: &ProxyResolver, download: bool) -> Option<String> {
        let source = self.source.as_ref()?;
        resolver.resolve_source(source, self.current, download)
    }
}

impl PlaybackControl for PlayerSession {
    fn source_kind(&self) -> Option<SourceKind> {
        self.source.as_ref().map(SourceDescriptor::kind)
    }

    fn available_qualities(&self) -> Vec<QualityLabel> {
        self.available.clone()
    }

    fn current_quality(&self) -> Option<QualityLabel> {
        self.current
    }

    fn switch_quality(&mut self, quality: QualityLabel) {
        if !self.available.contains(&quality) {
            debug!(quality = %quality, "Quality not offered by current source");
            return;
        }

        if self.source_kind() == Some(SourceKind::Hls) {
            self.engine_automatic = false;
        }
        self.current = Some(quality);
        info!(quality = %quality, "Switched quality");
    }

    fn enable_automatic_quality(&mut self) {
        match self.source_kind() {
            Some(SourceKind::Hls) => {
                self.engine_automatic = true;
                info!("Adaptive engine now selects HLS levels");
            }
            _ => debug!("Automatic quality is not supported for this content type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::SelectionPolicy;
    use QualityLabel::*;

    fn manual(last: QualityLabel) -> QualityPreferences {
        QualityPreferences {
            automatic_quality: false,
            last_chosen_quality: Some(last),
        }
    }

    fn file_source() -> SourceDescriptor {
        SourceDescriptor::file([
            (P480, "https://cdn.example/480.mp4".to_string()),
            (P1080, "https://cdn.example/1080.mp4".to_string()),
        ])
    }

    #[test]
    fn test_file_load_starts_at_best_in_automatic_mode() {
        let mut session = PlayerSession::new();
        session.load_source(file_source(), &QualityPreferences::default());
        assert_eq!(session.current_quality(), Some(P1080));
        assert_eq!(session.available_qualities(), vec![P480, P1080]);
        assert!(!session.engine_automatic());
    }

    #[test]
    fn test_file_load_honours_last_choice() {
        let mut session = PlayerSession::new();
        session.load_source(file_source(), &manual(P720));
        assert_eq!(session.current_quality(), Some(P480));
    }

    #[test]
    fn test_switch_ignores_unavailable() {
        let mut session = PlayerSession::new();
        session.load_source(file_source(), &QualityPreferences::default());
        session.switch_quality(P4k);
        assert_eq!(session.current_quality(), Some(P1080));
        session.switch_quality(P480);
        assert_eq!(session.current_quality(), Some(P480));
    }

    #[test]
    fn test_hls_levels_follow_engine_mode() {
        let mut session = PlayerSession::new();
        session.load_source(
            SourceDescriptor::hls("https://cdn.example/master.m3u8"),
            &QualityPreferences::default(),
        );
        assert!(session.engine_automatic());
        assert_eq!(session.current_quality(), None);

        session.set_hls_levels([P1080, P360, P720]);
        assert_eq!(session.available_qualities(), vec![P360, P720, P1080]);
        assert_eq!(session.current_quality(), None);

        session.switch_quality(P360);
        assert!(!session.engine_automatic());
        assert_eq!(session.current_quality(), Some(P360));

        session.enable_automatic_quality();
        assert!(session.engine_automatic());
    }

    #[test]
    fn test_hls_manual_mode_pins_level_on_arrival() {
        let mut session = PlayerSession::new();
        session.load_source(
            SourceDescriptor::hls("https://cdn.example/master.m3u8"),
            &manual(P720),
        );
        assert!(!session.engine_automatic());
        session.set_hls_levels([P480, P720, P1080]);
        assert_eq!(session.current_quality(), Some(P720));
    }

    #[test]
    fn test_enable_automatic_on_file_is_noop() {
        let mut session = PlayerSession::new();
        session.load_source(file_source(), &QualityPreferences::default());
        session.enable_automatic_quality();
        assert!(!session.engine_automatic());
    }

    #[test]
    fn test_resolved_url_uses_current_quality() {
        let resolver = ProxyResolver::new(
            vec!["https://proxy1.example".to_string()],
            SelectionPolicy::RoundRobin,
        );
        let mut session = PlayerSession::new();
        assert!(session.resolved_url(&resolver, false).is_none());

        session.load_source(file_source(), &manual(P480));
        let url = session.resolved_url(&resolver, false).unwrap();
        assert!(url.contains("480.mp4"));
    }
}
