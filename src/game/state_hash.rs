//! Deterministic state hashing
//!
//! Hashes only the gameplay-relevant part of a `GameState` (stacks, seat,
//! challenge status, round). Two runs that reach the same position produce
//! the same hash regardless of how they got there.

use crate::game::GameState;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Fields that don't affect gameplay
const EXCLUDED_FIELDS: &[&str] = &["history", "seed", "logger"];

/// Compute a deterministic hash of game state
pub fn compute_state_hash(game: &GameState) -> u64 {
    let json_value = match serde_json::to_value(game) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Warning: Failed to serialize game state for hashing: {}", e);
            return 0;
        }
    };

    let cleaned = strip_metadata(json_value);

    let canonical = match serde_json::to_string(&cleaned) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to canonicalize cleaned state: {}", e);
            return 0;
        }
    };

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

/// Remove excluded fields from the top-level object
fn strip_metadata(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) => {
            for field in EXCLUDED_FIELDS {
                map.remove(*field);
            }
            serde_json::Value::Object(map)
        }
        other => other,
    }
}

/// Format a hash for display (shows first 8 hex digits)
pub fn format_hash(hash: u64) -> String {
    format!("{:08x}", (hash >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Seat;

    #[test]
    fn test_strip_metadata() {
        let json = serde_json::json!({
            "round": 5,
            "seed": 42,
            "history": ["action1", "action2"],
            "table": { "cards": [1, 2] }
        });

        let cleaned = strip_metadata(json);

        assert_eq!(
            cleaned,
            serde_json::json!({
                "round": 5,
                "table": { "cards": [1, 2] }
            })
        );
    }

    #[test]
    fn test_hash_ignores_history_and_seed() {
        let a = GameState::new_shuffled(3).unwrap();
        let mut b = a.clone();
        b.seed = None;
        b.history.clear();
        assert_eq!(compute_state_hash(&a), compute_state_hash(&b));
    }

    #[test]
    fn test_hash_tracks_gameplay_changes() {
        let a = GameState::new_shuffled(3).unwrap();
        let mut b = a.clone();
        b.play_card(Seat::Player1).unwrap();
        assert_ne!(compute_state_hash(&a), compute_state_hash(&b));

        let mut c = a.clone();
        c.current = Seat::Player2;
        assert_ne!(compute_state_hash(&a), compute_state_hash(&c));
    }

    #[test]
    fn test_format_hash() {
        assert_eq!(format_hash(0xdead_beef_0000_0001), "deadbeef");
    }
}
