use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::quality::QualityLabel;

/// Request headers forwarded to the proxy. Ordered so the encoded JSON is
/// stable for a given set of headers.
pub type Headers = BTreeMap<String, String>;

/// One independently fetchable quality of a file-style source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamVariant {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

/// A playable source as produced by provider resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceDescriptor {
    /// Discrete progressive files, one per quality.
    File {
        qualities: BTreeMap<QualityLabel, StreamVariant>,
        #[serde(default, rename = "preferredHeaders", skip_serializing_if = "Option::is_none")]
        preferred_headers: Option<Headers>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<Headers>,
    },
    /// A single adaptive HLS manifest.
    Hls {
        url: String,
        #[serde(default, rename = "preferredHeaders", skip_serializing_if = "Option::is_none")]
        preferred_headers: Option<Headers>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<Headers>,
    },
}

/// Kind of a source, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Hls,
}

impl SourceDescriptor {
    pub fn file(qualities: impl IntoIterator<Item = (QualityLabel, String)>) -> Self {
        Self::File {
            qualities: qualities
                .into_iter()
                .map(|(label, url)| (label, StreamVariant { url, headers: None }))
                .collect(),
            preferred_headers: None,
            headers: None,
        }
    }

    pub fn hls(url: impl Into<String>) -> Self {
        Self::Hls {
            url: url.into(),
            preferred_headers: None,
            headers: None,
        }
    }

    pub fn with_preferred_headers(mut self, value: Headers) -> Self {
        match &mut self {
            Self::File {
                preferred_headers, ..
            }
            | Self::Hls {
                preferred_headers, ..
            } => *preferred_headers = Some(value),
        }
        self
    }

    pub fn with_headers(mut self, value: Headers) -> Self {
        match &mut self {
            Self::File { headers, .. } | Self::Hls { headers, .. } => *headers = Some(value),
        }
        self
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::File { .. } => SourceKind::File,
            Self::Hls { .. } => SourceKind::Hls,
        }
    }

    pub fn is_hls(&self) -> bool {
        self.kind() == SourceKind::Hls
    }

    /// Qualities the source can actually serve, ascending. Always empty for
    /// HLS, whose ladder lives inside the manifest.
    pub fn available_qualities(&self) -> Vec<QualityLabel> {
        match self {
            Self::File { qualities, .. } => qualities.keys().copied().collect(),
            Self::Hls { .. } => Vec::new(),
        }
    }

    /// Source-level headers with `headers` merged over `preferred_headers`.
    pub fn effective_headers(&self) -> Headers {
        let (preferred, overrides) = match self {
            Self::File {
                preferred_headers,
                headers,
                ..
            }
            | Self::Hls {
                preferred_headers,
                headers,
                ..
            } => (preferred_headers, headers),
        };

        let mut merged = preferred.clone().unwrap_or_default();
        if let Some(overrides) = overrides {
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// The media URL to play and the headers to fetch it with.
    ///
    /// File sources need a quality that exists in the source; a variant's own
    /// headers win over the source-level ones. Returns `None` when there is
    /// nothing to resolve.
    pub fn stream_for(&self, quality: Option<QualityLabel>) -> Option<(&str, Headers)> {
        match self {
            Self::File { qualities, .. } => {
                let variant = qualities.get(&quality?)?;
                let mut headers = self.effective_headers();
                if let Some(own) = &variant.headers {
                    headers.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Some((variant.url.as_str(), headers))
            }
            Self::Hls { url, .. } => Some((url.as_str(), self.effective_headers())),
        }
    }
}
