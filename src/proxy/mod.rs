//! Proxy URL resolution
//!
//! - `balancer`: endpoint selection across the configured proxy pool
//! - `resolver`: proxy URL construction and already-proxied detection
//! - `external_player`: deep links that hand a resolved URL to another player

pub mod balancer;
pub mod external_player;
pub mod resolver;

pub use balancer::{LoadBalancer, SelectionPolicy};
pub use external_player::ExternalPlayer;
pub use resolver::{HLS_PROXY_SIGNATURE, ProxyResolver, ProxyRoute, WEB_PROXY_SIGNATURE};
