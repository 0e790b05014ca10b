//! Quality selection
//!
//! Two independent inputs decide which quality plays:
//!
//! - an explicit pick pins the current source to a label and is remembered
//!   as `last_chosen_quality`;
//! - the automatic flag decides how the *next* source starts, and for HLS
//!   hands level selection back to the adaptive engine when re-enabled.
//!
//! Picking a quality never clears the automatic flag, and toggling the flag
//! never touches `last_chosen_quality`.

use tracing::debug;

use super::store::{PreferenceStore, QualityPreferences};
use crate::models::{QualityLabel, SourceKind};

/// Side effects the selector needs from the active playback session.
pub trait PlaybackControl {
    /// Kind of the loaded source, if any.
    fn source_kind(&self) -> Option<SourceKind>;

    /// Qualities the loaded source can actually play.
    fn available_qualities(&self) -> Vec<QualityLabel>;

    fn current_quality(&self) -> Option<QualityLabel>;

    fn switch_quality(&mut self, quality: QualityLabel);

    fn enable_automatic_quality(&mut self);
}

/// One row of the quality menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityOption {
    pub label: QualityLabel,
    /// The source can play this quality.
    pub selectable: bool,
    /// This quality is playing now.
    pub selected: bool,
}

/// Menu rows, ascending: the common ladder plus anything else the source offers.
pub fn visible_qualities(
    available: &[QualityLabel],
    current: Option<QualityLabel>,
) -> Vec<QualityOption> {
    QualityLabel::all()
        .into_iter()
        .filter(|q| *q != QualityLabel::Unknown)
        .filter(|q| q.is_always_visible() || available.contains(q))
        .map(|label| QualityOption {
            label,
            selectable: available.contains(&label),
            selected: current == Some(label),
        })
        .collect()
}

/// Automatic quality only means something for adaptive streams.
pub fn supports_automatic(kind: Option<SourceKind>) -> bool {
    kind == Some(SourceKind::Hls)
}

/// Quality a freshly loaded source should start with.
///
/// Automatic mode (or no usable last pick) starts at the best available
/// quality. Otherwise the last pick wins if present, then the closest
/// quality below it, then the closest above it.
pub fn preferred_quality(
    available: &[QualityLabel],
    preferences: &QualityPreferences,
) -> Option<QualityLabel> {
    let mut known: Vec<QualityLabel> = available
        .iter()
        .copied()
        .filter(|q| *q != QualityLabel::Unknown)
        .collect();
    known.sort();
    known.dedup();

    if known.is_empty() {
        return available.first().copied();
    }

    let wanted = match preferences.last_chosen_quality {
        Some(q) if !preferences.automatic_quality && q != QualityLabel::Unknown => q,
        _ => return known.last().copied(),
    };

    if known.contains(&wanted) {
        return Some(wanted);
    }

    known
        .iter()
        .rev()
        .find(|q| **q < wanted)
        .or_else(|| known.iter().find(|q| **q > wanted))
        .copied()
}

/// Applies user quality actions to the preference store and the playback session.
#[derive(Debug)]
pub struct QualitySelector {
    store: PreferenceStore,
}

impl QualitySelector {
    pub fn new(store: PreferenceStore) -> Self {
        Self { store }
    }

    pub fn preferences(&self) -> &QualityPreferences {
        self.store.preferences()
    }

    /// Menu rows for the session's current source.
    pub fn options<P: PlaybackControl + ?Sized>(&self, player: &P) -> Vec<QualityOption> {
        visible_qualities(&player.available_qualities(), player.current_quality())
    }

    /// Whether the automatic toggle should be offered for the session.
    pub fn supports_automatic<P: PlaybackControl + ?Sized>(&self, player: &P) -> bool {
        supports_automatic(player.source_kind())
    }

    /// Explicit user pick. Remembers the label and switches the session to it.
    ///
    /// Returns `false` without side effects when the source cannot play the label.
    pub fn choose<P: PlaybackControl + ?Sized>(
        &mut self,
        player: &mut P,
        quality: QualityLabel,
    ) -> bool {
        if quality == QualityLabel::Unknown || !player.available_qualities().contains(&quality) {
            debug!(quality = %quality, "Ignoring pick of unavailable quality");
            return false;
        }

        self.store.set_last_chosen_quality(Some(quality));
        player.switch_quality(quality);
        true
    }

    /// Flip the automatic flag and return the new value.
    ///
    /// Turning it on for an HLS source lets the engine pick levels again
    /// right away; turning it off only affects future source loads.
    pub fn toggle_automatic<P: PlaybackControl + ?Sized>(&mut self, player: &mut P) -> bool {
        let enabled = !self.store.preferences().automatic_quality;
        self.store.set_automatic_quality(enabled);

        if enabled {
            if supports_automatic(player.source_kind()) {
                player.enable_automatic_quality();
            } else {
                debug!("Automatic quality stored; current source has no adaptive levels");
            }
        }
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use QualityLabel::*;

    #[derive(Default)]
    struct FakePlayer {
        kind: Option<SourceKind>,
        available: Vec<QualityLabel>,
        current: Option<QualityLabel>,
        switched: Vec<QualityLabel>,
        auto_enabled: usize,
    }

    impl PlaybackControl for FakePlayer {
        fn source_kind(&self) -> Option<SourceKind> {
            self.kind
        }

        fn available_qualities(&self) -> Vec<QualityLabel> {
            self.available.clone()
        }

        fn current_quality(&self) -> Option<QualityLabel> {
            self.current
        }

        fn switch_quality(&mut self, quality: QualityLabel) {
            self.current = Some(quality);
            self.switched.push(quality);
        }

        fn enable_automatic_quality(&mut self) {
            self.auto_enabled += 1;
        }
    }

    fn prefs(automatic: bool, last: Option<QualityLabel>) -> QualityPreferences {
        QualityPreferences {
            automatic_quality: automatic,
            last_chosen_quality: last,
        }
    }

    #[test]
    fn test_visible_set_is_ladder_plus_available() {
        let labels: Vec<_> = visible_qualities(&[P720, P1080], None)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec![P360, P480, P720, P1080, P4k]);
    }

    #[test]
    fn test_unknown_is_never_visible() {
        let options = visible_qualities(&[Unknown, P480], Some(Unknown));
        assert!(options.iter().all(|o| o.label != Unknown));
    }

    #[test]
    fn test_option_flags() {
        let options = visible_qualities(&[P720, P1080], Some(P720));
        let p720 = options.iter().find(|o| o.label == P720).unwrap();
        let p360 = options.iter().find(|o| o.label == P360).unwrap();
        assert!(p720.selectable && p720.selected);
        assert!(!p360.selectable && !p360.selected);
    }

    #[test]
    fn test_supports_automatic_only_for_hls() {
        assert!(supports_automatic(Some(SourceKind::Hls)));
        assert!(!supports_automatic(Some(SourceKind::File)));
        assert!(!supports_automatic(None));
    }

    #[test]
    fn test_preferred_quality_automatic_picks_best() {
        let available = [P480, P1080, P720];
        assert_eq!(preferred_quality(&available, &prefs(true, Some(P480))), Some(P1080));
        assert_eq!(preferred_quality(&available, &prefs(false, None)), Some(P1080));
    }

    #[test]
    fn test_preferred_quality_manual_fallbacks() {
        let available = [P480, P1080];
        assert_eq!(preferred_quality(&available, &prefs(false, Some(P480))), Some(P480));
        assert_eq!(preferred_quality(&available, &prefs(false, Some(P720))), Some(P480));
        assert_eq!(preferred_quality(&[P1080, P4k], &prefs(false, Some(P360))), Some(P1080));
    }

    #[test]
    fn test_preferred_quality_edge_cases() {
        assert_eq!(preferred_quality(&[], &prefs(true, None)), None);
        assert_eq!(preferred_quality(&[Unknown], &prefs(false, Some(P720))), Some(Unknown));
        assert_eq!(preferred_quality(&[Unknown, P360], &prefs(true, None)), Some(P360));
    }

    #[test]
    fn test_choose_persists_and_switches() {
        let mut selector = QualitySelector::new(PreferenceStore::in_memory());
        let mut player = FakePlayer {
            kind: Some(SourceKind::File),
            available: vec![P720, P1080],
            current: Some(P1080),
            ..Default::default()
        };

        assert!(selector.choose(&mut player, P720));
        assert_eq!(player.current, Some(P720));
        assert_eq!(selector.preferences().last_chosen_quality, Some(P720));
        assert!(selector.preferences().automatic_quality, "pick must not disable automatic mode");
    }

    #[test]
    fn test_choose_rejects_unavailable() {
        let mut selector = QualitySelector::new(PreferenceStore::in_memory());
        let mut player = FakePlayer {
            kind: Some(SourceKind::File),
            available: vec![P720],
            ..Default::default()
        };

        assert!(!selector.choose(&mut player, P4k));
        assert!(!selector.choose(&mut player, Unknown));
        assert!(player.switched.is_empty());
        assert_eq!(selector.preferences().last_chosen_quality, None);
    }

    #[test]
    fn test_toggle_on_enables_engine_for_hls_only() {
        let mut selector = QualitySelector::new(PreferenceStore::in_memory());
        let mut hls = FakePlayer {
            kind: Some(SourceKind::Hls),
            ..Default::default()
        };

        assert!(!selector.toggle_automatic(&mut hls));
        assert_eq!(hls.auto_enabled, 0);
        assert!(selector.toggle_automatic(&mut hls));
        assert_eq!(hls.auto_enabled, 1);

        let mut file = FakePlayer {
            kind: Some(SourceKind::File),
            ..Default::default()
        };
        selector.toggle_automatic(&mut file);
        selector.toggle_automatic(&mut file);
        assert_eq!(file.auto_enabled, 0);
    }

    #[test]
    fn test_toggle_leaves_last_choice_alone() {
        let mut selector = QualitySelector::new(PreferenceStore::in_memory());
        let mut player = FakePlayer {
            kind: Some(SourceKind::Hls),
            available: vec![P480, P1080],
            ..Default::default()
        };
        selector.choose(&mut player, P480);

        selector.toggle_automatic(&mut player);
        selector.toggle_automatic(&mut player);
        assert_eq!(selector.preferences().last_chosen_quality, Some(P480));
        assert!(selector.preferences().automatic_quality);
    }
}
