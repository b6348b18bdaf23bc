// Persisted configuration consumption
//
// The engine does not own persistence; it is seeded once at startup from a
// persisted snapshot and thereafter mutated only through control events.
// Snapshots come from a cooperating but possibly stale UI, so malformed
// input degrades silently to defaults.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::types::{RoutingState, EQ_BAND_COUNT};
use super::validation::clamp_eq_gain;

pub const DEFAULT_LIMITER_THRESHOLD_DB: f32 = -6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub enabled: bool,
    #[serde(rename = "limiterThreshold")]
    pub limiter_threshold_db: f32,
    #[serde(rename = "eqEnabled")]
    pub eq_enabled: bool,
    #[serde(rename = "hpEnabled")]
    pub hp_enabled: bool,
    #[serde(rename = "eqGains", deserialize_with = "lenient_eq_gains")]
    pub eq_gains: [f32; EQ_BAND_COUNT],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limiter_threshold_db: DEFAULT_LIMITER_THRESHOLD_DB,
            eq_enabled: true,
            hp_enabled: false,
            eq_gains: [0.0; EQ_BAND_COUNT],
        }
    }
}

impl EngineConfig {
    /// Clamp every mutable value into its supported range.
    pub fn sanitized(mut self) -> Self {
        if !self.limiter_threshold_db.is_finite() {
            self.limiter_threshold_db = DEFAULT_LIMITER_THRESHOLD_DB;
        }
        for gain in &mut self.eq_gains {
            *gain = clamp_eq_gain(*gain);
        }
        self
    }

    /// Parse a persisted snapshot. Malformed input seeds defaults.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<EngineConfig>(raw) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                warn!("Ignoring malformed persisted configuration: {}", err);
                Self::default()
            }
        }
    }

    pub fn routing_state(&self) -> RoutingState {
        RoutingState {
            enabled_globally: self.enabled,
            high_pass_enabled: self.hp_enabled,
            equalizer_enabled: self.eq_enabled,
        }
    }
}

/// Gain arrays must have exactly 8 entries; anything else is ignored.
/// Non-numeric entries are coerced to 0 dB.
fn lenient_eq_gains<'de, D>(deserializer: D) -> Result<[f32; EQ_BAND_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    if raw.len() != EQ_BAND_COUNT {
        warn!(
            "Ignoring persisted EQ gain array of length {} (expected {})",
            raw.len(),
            EQ_BAND_COUNT
        );
        return Ok([0.0; EQ_BAND_COUNT]);
    }
    let mut gains = [0.0_f32; EQ_BAND_COUNT];
    for (slot, value) in gains.iter_mut().zip(raw.iter()) {
        *slot = value
            .as_f64()
            .map(|gain| clamp_eq_gain(gain as f32))
            .unwrap_or(0.0);
    }
    Ok(gains)
}
