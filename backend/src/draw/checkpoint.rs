//! Checkpoint - Save/Restore Draw State
//!
//! A [`DrawSnapshot`] captures enough to rebuild a draw mid-way: the reveal
//! order, how far it got, and the generator state for the next reset.
//! Restoring replays the first `cursor` steps, so assignments, drawn flags and
//! the current draw's events come back identical and the draw continues the
//! same canonical sequence.
//!
//! # Critical Invariants
//!
//! - **Roster matching**: a snapshot only restores against the roster it was
//!   taken from (SHA-256 of the canonical JSON roster)
//! - **Bijection**: the stored order must cover every participant exactly once
//! - **Bounded cursor**: `cursor ≤ capacity`

use crate::draw::engine::{DrawConfig, DrawEngine, DrawError};
use crate::models::event::DrawEvent;
use crate::rng::{Permutation, RngManager};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Serializable draw state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSnapshot {
    pub draw_id: Uuid,

    /// Generator state after the current order was produced
    pub rng_state: u64,

    /// Reveal order, draw index → participant id
    pub permutation: Vec<usize>,

    /// Participants already revealed
    pub cursor: usize,

    /// SHA256 hash of the roster (for validation)
    pub roster_hash: String,
}

impl DrawSnapshot {
    pub fn to_json(&self) -> Result<String, DrawError> {
        serde_json::to_string(self)
            .map_err(|e| DrawError::Serialization(format!("Snapshot serialization failed: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, DrawError> {
        serde_json::from_str(json)
            .map_err(|e| DrawError::Serialization(format!("Snapshot parse failed: {}", e)))
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of any serializable value.
///
/// Object keys are sorted before hashing so the digest does not depend on
/// field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, DrawError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)
        .map_err(|e| DrawError::Serialization(format!("Config serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| DrawError::Serialization(format!("Config serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Snapshot / Restore
// ============================================================================

impl DrawEngine {
    /// Capture the current draw.
    pub fn snapshot(&self) -> Result<DrawSnapshot, DrawError> {
        Ok(DrawSnapshot {
            draw_id: self.draw_id(),
            rng_state: self.rng_state(),
            permutation: self.permutation().as_slice().to_vec(),
            cursor: self.cursor(),
            roster_hash: compute_config_hash(self.roster())?,
        })
    }

    /// Rebuild an engine from `snapshot`, replaying its revealed steps.
    ///
    /// # Errors
    ///
    /// `DrawError::Snapshot` if the roster hash differs, the order is not a
    /// bijection over the roster, or the cursor is past the end.
    pub fn restore(config: DrawConfig, snapshot: DrawSnapshot) -> Result<Self, DrawError> {
        config.validate()?;
        validate_snapshot(&config, &snapshot)?;

        let permutation = Permutation::from_vec(snapshot.permutation).ok_or_else(|| {
            DrawError::Snapshot("reveal order is not a permutation".to_string())
        })?;

        let mut engine = DrawEngine::from_parts(
            config,
            RngManager::new(snapshot.rng_state),
            snapshot.draw_id,
            permutation,
        );
        engine.log_event(DrawEvent::Reset {
            draw_id: snapshot.draw_id,
        });
        for _ in 0..snapshot.cursor {
            engine.step();
        }

        tracing::info!(
            draw_id = %snapshot.draw_id,
            cursor = snapshot.cursor,
            "Draw restored from snapshot"
        );
        Ok(engine)
    }
}

/// Check a snapshot against the config it is about to be restored into.
pub fn validate_snapshot(config: &DrawConfig, snapshot: &DrawSnapshot) -> Result<(), DrawError> {
    let expected_hash = compute_config_hash(&config.roster)?;
    if snapshot.roster_hash != expected_hash {
        return Err(DrawError::Snapshot(
            "roster does not match the one the snapshot was taken from".to_string(),
        ));
    }

    let capacity = config.capacity();
    if snapshot.permutation.len() != capacity {
        return Err(DrawError::Snapshot(format!(
            "reveal order has {} entries, expected {}",
            snapshot.permutation.len(),
            capacity
        )));
    }

    if !crate::rng::is_permutation(&snapshot.permutation) {
        return Err(DrawError::Snapshot(
            "reveal order is not a permutation".to_string(),
        ));
    }

    if snapshot.cursor > capacity {
        return Err(DrawError::Snapshot(format!(
            "cursor {} is past the last slot ({})",
            snapshot.cursor, capacity
        )));
    }

    Ok(())
}
