//! Eviction candidate selection, one ordering per policy.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use bindery_core::config::EvictionPolicy;

/// Snapshot of the fields eviction ordering needs.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub key: String,
    pub size_bytes: u64,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub expires_at: DateTime<Utc>,
}

/// Order candidates so that earlier entries are evicted first.
pub fn order_candidates(policy: EvictionPolicy, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    match policy {
        EvictionPolicy::Lru => {
            candidates.sort_by_key(|c| c.last_accessed);
        }
        EvictionPolicy::Lfu => {
            // Tie-break by recency so cold duplicates go first.
            candidates.sort_by_key(|c| (c.access_count, c.last_accessed));
        }
        EvictionPolicy::Ttl => {
            candidates.sort_by_key(|c| c.expires_at);
        }
        EvictionPolicy::Random => {
            candidates.shuffle(&mut rand::thread_rng());
        }
    }
    candidates
}

/// Keys to evict so total size drops to `target_bytes`.
pub fn select_victims(
    policy: EvictionPolicy,
    candidates: Vec<Candidate>,
    current_bytes: u64,
    target_bytes: u64,
) -> Vec<String> {
    let mut remaining = current_bytes;
    let mut victims = Vec::new();
    for candidate in order_candidates(policy, candidates) {
        if remaining <= target_bytes {
            break;
        }
        remaining = remaining.saturating_sub(candidate.size_bytes);
        victims.push(candidate.key);
    }
    victims
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate(key: &str, size: u64, accessed_mins_ago: i64, count: u64) -> Candidate {
        let now = Utc::now();
        Candidate {
            key: key.to_string(),
            size_bytes: size,
            last_accessed: now - Duration::minutes(accessed_mins_ago),
            access_count: count,
            expires_at: now + Duration::minutes(accessed_mins_ago),
        }
    }

    #[test]
    fn lru_evicts_least_recently_accessed_first() {
        let victims = select_victims(
            EvictionPolicy::Lru,
            vec![
                candidate("hot", 300, 1, 10),
                candidate("warm", 300, 30, 10),
                candidate("cold", 300, 300, 10),
            ],
            900,
            400,
        );
        assert_eq!(victims, vec!["cold".to_string(), "warm".to_string()]);
    }

    #[test]
    fn lfu_evicts_least_frequently_accessed_first() {
        let victims = select_victims(
            EvictionPolicy::Lfu,
            vec![
                candidate("popular", 300, 5, 100),
                candidate("rare", 300, 5, 1),
            ],
            600,
            400,
        );
        assert_eq!(victims, vec!["rare".to_string()]);
    }

    #[test]
    fn eviction_stops_at_target() {
        let victims = select_victims(
            EvictionPolicy::Ttl,
            vec![
                candidate("a", 500, 1, 1),
                candidate("b", 500, 2, 1),
                candidate("c", 500, 3, 1),
            ],
            1_500,
            1_000,
        );
        assert_eq!(victims.len(), 1);
    }

    #[test]
    fn random_policy_reaches_target_too() {
        let candidates: Vec<_> = (0..10).map(|i| candidate(&format!("k{i}"), 100, i, 1)).collect();
        let victims = select_victims(EvictionPolicy::Random, candidates, 1_000, 500);
        assert_eq!(victims.len(), 5);
    }
}
