//! Proxy endpoint selection
//!
//! Spreads requests across the configured proxy base URLs. Round robin is
//! the default.

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// How a base URL is picked for each request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    RoundRobin,
    Random,
}

/// Picks one endpoint per call from a fixed list.
#[derive(Debug)]
pub struct LoadBalancer {
    endpoints: Vec<String>,
    policy: SelectionPolicy,
    cursor: AtomicUsize,
}

impl LoadBalancer {
    pub fn new(endpoints: Vec<String>, policy: SelectionPolicy) -> Self {
        Self {
            endpoints,
            policy,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Next endpoint, or `None` when no endpoint is configured.
    pub fn pick(&self) -> Option<&str> {
        let len = self.endpoints.len();
        if len == 0 {
            return None;
        }

        let index = match self.policy {
            SelectionPolicy::RoundRobin => self.cursor.fetch_add(1, Ordering::Relaxed) % len,
            SelectionPolicy::Random => rng().random_range(0..len),
        };

        self.endpoints.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn endpoints(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://proxy{i}.example")).collect()
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let balancer = LoadBalancer::new(Vec::new(), SelectionPolicy::RoundRobin);
        assert!(balancer.is_empty());
        assert_eq!(balancer.pick(), None);

        let balancer = LoadBalancer::new(Vec::new(), SelectionPolicy::Random);
        assert_eq!(balancer.pick(), None);
    }

    #[test]
    fn test_round_robin_cycles_in_order() {
        let balancer = LoadBalancer::new(endpoints(3), SelectionPolicy::RoundRobin);
        let picked: Vec<_> = (0..6).filter_map(|_| balancer.pick()).collect();
        assert_eq!(
            picked,
            vec![
                "https://proxy1.example",
                "https://proxy2.example",
                "https://proxy3.example",
                "https://proxy1.example",
                "https://proxy2.example",
                "https://proxy3.example",
            ]
        );
    }

    #[test]
    fn test_random_stays_within_pool() {
        let pool = endpoints(4);
        let balancer = LoadBalancer::new(pool.clone(), SelectionPolicy::Random);
        let seen: HashSet<_> = (0..200).filter_map(|_| balancer.pick()).collect();
        assert!(seen.iter().all(|e| pool.iter().any(|p| p.as_str() == *e)));
        assert!(seen.len() > 1, "random selection should spread load");
    }

    #[test]
    fn test_policy_names() {
        let policy: SelectionPolicy = serde_json::from_str("\"round_robin\"").unwrap();
        assert_eq!(policy, SelectionPolicy::RoundRobin);
        let policy: SelectionPolicy = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(policy, SelectionPolicy::Random);
    }
}
