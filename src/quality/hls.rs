//! HLS quality ladder extraction
//!
//! An HLS source exposes a single manifest URL; its qualities only show up as
//! `#EXT-X-STREAM-INF` entries in the master playlist. Parsing is line based
//! and tolerant: unknown tags are skipped and a variant without a
//! `RESOLUTION` attribute still counts (as `unknown`).

use crate::models::QualityLabel;

/// One `#EXT-X-STREAM-INF` entry of a master playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterVariant {
    pub bandwidth: u64,
    pub resolution: Option<(u32, u32)>,
    pub uri: String,
}

impl MasterVariant {
    pub fn quality(&self) -> QualityLabel {
        self.resolution
            .map(|(_, height)| QualityLabel::from_height(height))
            .unwrap_or(QualityLabel::Unknown)
    }
}

/// Variants of a master playlist in source order.
///
/// Each `#EXT-X-STREAM-INF` tag applies to the next URI line; a tag with no
/// URI after it is dropped.
pub fn parse_master_variants(text: &str) -> Vec<MasterVariant> {
    let mut variants = Vec::new();
    let mut stream_inf: Option<MasterVariant> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(attrs) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            stream_inf = Some(stream_inf_attributes(attrs));
        } else if !line.starts_with('#')
            && let Some(mut variant) = stream_inf.take()
        {
            variant.uri = line.to_string();
            variants.push(variant);
        }
    }
    variants
}

fn stream_inf_attributes(attrs: &str) -> MasterVariant {
    let mut variant = MasterVariant {
        bandwidth: 0,
        resolution: None,
        uri: String::new(),
    };

    for (name, value) in split_attributes(attrs)
        .into_iter()
        .filter_map(|attr| attr.trim().split_once('='))
    {
        match name {
            "BANDWIDTH" => variant.bandwidth = value.parse().unwrap_or(0),
            "RESOLUTION" => {
                variant.resolution = value
                    .split_once('x')
                    .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)));
            }
            _ => {}
        }
    }
    variant
}

/// Distinct qualities offered by a master playlist, ascending.
///
/// A media playlist (no variants) yields an empty ladder.
pub fn qualities_from_master_playlist(text: &str) -> Vec<QualityLabel> {
    let mut ladder: Vec<QualityLabel> = parse_master_variants(text)
        .iter()
        .map(MasterVariant::quality)
        .collect();
    ladder.sort();
    ladder.dedup();
    ladder
}

// Attribute lists may carry quoted values with commas, e.g. CODECS="avc1,mp4a".
fn split_attributes(attrs: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in attrs.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&attrs[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&attrs[start..]);
    parts
}
