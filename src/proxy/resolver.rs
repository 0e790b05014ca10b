//! Proxy URL construction
//!
//! Media hosts frequently refuse browser playback (CORS, referer checks,
//! auth headers), so playback goes through a proxy service that performs the
//! upstream fetch itself. The upstream URL and the headers the proxy must
//! send travel as query parameters:
//!
//! ```text
//! {base}/proxy?url=<url>&headers=<json>[&download=true]
//! {base}/proxy.m3u8?type=hls&url=<url>&headers=<json>[&download=true]
//! ```
//!
//! Construction never fails the caller. Without a configured endpoint the
//! original URL is handed back and a warning is logged.

use tracing::{debug, warn};

use super::balancer::{LoadBalancer, SelectionPolicy};
use crate::config::ProxyConfig;
use crate::errors::{ProxyError, ProxyResult};
use crate::models::{Headers, QualityLabel, SourceDescriptor, SourceKind};
use crate::utils::url::UrlUtils;

/// Query signature of an HLS proxy URL.
pub const HLS_PROXY_SIGNATURE: &str = "/proxy.m3u8?type=hls&url=";

/// Query signature of a web (generic) proxy URL.
pub const WEB_PROXY_SIGNATURE: &str = "/proxy?type=web&url=";

/// Which proxy route a URL is sent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRoute {
    /// Generic byte proxy for progressive files.
    File,
    /// Playlist-rewriting proxy for HLS manifests.
    Hls,
}

impl ProxyRoute {
    fn path_and_marker(self) -> &'static str {
        match self {
            Self::File => "/proxy?",
            Self::Hls => "/proxy.m3u8?type=hls&",
        }
    }
}

impl From<SourceKind> for ProxyRoute {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::File => Self::File,
            SourceKind::Hls => Self::Hls,
        }
    }
}

/// Turns media URLs into fetchable playback URLs.
#[derive(Debug)]
pub struct ProxyResolver {
    balancer: LoadBalancer,
}

impl ProxyResolver {
    /// Build a resolver over `endpoints`. Base URLs are trimmed and lose any
    /// trailing slash; blank entries are dropped.
    pub fn new(endpoints: Vec<String>, policy: SelectionPolicy) -> Self {
        let endpoints = endpoints
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(UrlUtils::strip_trailing_slashes)
            .collect();

        Self {
            balancer: LoadBalancer::new(endpoints, policy),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.normalized_urls(), config.selection)
    }

    /// Resolver with no endpoints; every URL passes through unchanged.
    pub fn passthrough() -> Self {
        Self::new(Vec::new(), SelectionPolicy::default())
    }

    pub fn endpoints(&self) -> &[String] {
        self.balancer.endpoints()
    }

    /// Build a proxy URL, reporting why it could not be built.
    pub fn try_build(
        &self,
        route: ProxyRoute,
        url: &str,
        headers: &Headers,
        download: bool,
    ) -> ProxyResult<String> {
        let base = self.balancer.pick().ok_or(ProxyError::NoEndpoints)?;
        let encoded_headers = serde_json::to_string(headers)?;

        let mut proxied = format!(
            "{base}{}url={}&headers={}",
            route.path_and_marker(),
            UrlUtils::encode_component(url),
            UrlUtils::encode_component(&encoded_headers),
        );
        if download {
            proxied.push_str("&download=true");
        }

        debug!(
            route = ?route,
            proxy = base,
            url = %UrlUtils::obfuscate_credentials(url),
            download,
            "built proxy url"
        );
        Ok(proxied)
    }

    /// Proxy URL for a progressive file, or `url` itself when no proxy is available.
    pub fn build_proxy_url(&self, url: &str, headers: &Headers, download: bool) -> String {
        self.build_or_passthrough(ProxyRoute::File, url, headers, download)
    }

    /// Proxy URL for an HLS manifest, or `url` itself when no proxy is available.
    pub fn build_m3u8_proxy_url(&self, url: &str, headers: &Headers, download: bool) -> String {
        self.build_or_passthrough(ProxyRoute::Hls, url, headers, download)
    }

    fn build_or_passthrough(
        &self,
        route: ProxyRoute,
        url: &str,
        headers: &Headers,
        download: bool,
    ) -> String {
        match self.try_build(route, url, headers, download) {
            Ok(proxied) => proxied,
            Err(ProxyError::NoEndpoints) => {
                match route {
                    ProxyRoute::File => warn!("No proxy URLs available in configuration"),
                    ProxyRoute::Hls => warn!("No M3U8 proxy URLs available in configuration"),
                }
                url.to_string()
            }
            Err(e) => {
                warn!(
                    url = %UrlUtils::obfuscate_credentials(url),
                    "Falling back to original URL: {}", e
                );
                url.to_string()
            }
        }
    }

    /// Whether `url` already points at a proxy and must not be wrapped again.
    pub fn is_already_proxied(&self, url: &str) -> bool {
        if url.contains(HLS_PROXY_SIGNATURE) || url.contains(WEB_PROXY_SIGNATURE) {
            return true;
        }

        self.endpoints().iter().any(|base| {
            url.strip_prefix(base.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
        })
    }

    /// Resolve the URL the player should fetch for `source`.
    ///
    /// File sources play the variant for `quality`; HLS sources play their
    /// manifest. Returns `None` when the source has nothing to play for the
    /// given quality.
    pub fn resolve_source(
        &self,
        source: &SourceDescriptor,
        quality: Option<QualityLabel>,
        download: bool,
    ) -> Option<String> {
        let (url, headers) = source.stream_for(quality)?;

        if self.is_already_proxied(url) {
            return Some(url.to_string());
        }

        Some(self.build_or_passthrough(source.kind().into(), url, &headers, download))
    }
}
