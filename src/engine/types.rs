// Core engine types and fixed DSP parameters
//
// This module contains the fundamental data structures for the processing
// graph: band and compressor specifications, routing state, source identity,
// and the control events that drive live reconfiguration.

use serde::{Deserialize, Serialize};

use super::validation::db_to_linear;

/// FIR length used for all crossover filters. Odd, so the impulse response
/// has an exact center tap and the design stays linear-phase.
pub const DEFAULT_TAP_COUNT: usize = 127;

/// Upper bound on per-band makeup gain before conversion to linear.
pub const MAX_MAKEUP_DB: f32 = 48.0;

/// Fixed post-makeup boost applied inside every band, compensating for the
/// insertion loss of narrow FIR band-splitting plus compression headroom.
pub const BAND_BOOST_LINEAR: f32 = 10.0;

/// Mix levels for the parallel dynamics paths inside a band.
pub const DOWNWARD_MIX: f32 = 0.7;
pub const UPWARD_MIX: f32 = 0.5;

/// Drive applied at the shared summation node all bands feed into.
pub const MASTER_SUM_GAIN: f32 = 5.0;

pub const EQ_BAND_COUNT: usize = 8;

/// Standard 8-band EQ frequencies (Hz), ascending and fixed at construction.
pub const EQ_FREQUENCIES: [f32; EQ_BAND_COUNT] = [
    68.0, 147.0, 315.0, 678.0, 1464.0, 3153.0, 6787.0, 14635.0,
];

pub const EQ_BAND_Q: f32 = 1.0;
pub const EQ_GAIN_RANGE_DB: f32 = 18.0;

/// Optional post-summation high-pass stage.
pub const HIGH_PASS_CUTOFF_HZ: f32 = 200.0;
pub const HIGH_PASS_Q: f32 = 1.0;

/// Limiter compensation never exceeds this, regardless of threshold.
pub const LIMITER_COMPENSATION_CAP_DB: f32 = 24.0;

/// Output ceiling trim, leaving a small safety margin below full scale.
pub const LIMITER_CEILING: f32 = 0.99;

/// Filter kind for FIR crossover design
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
}

/// One crossover band: frequency range plus fixed makeup gain.
///
/// Invariant: `0 < low_hz < high_hz`. Adjacent bands overlap slightly at the
/// crossover points; the overlap is shaped by filter roll-off, not by
/// mutually exclusive passbands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSpec {
    pub low_hz: f32,
    pub high_hz: f32,
    pub makeup_db: f32,
}

impl BandSpec {
    /// Makeup gain as a linear factor, clamped to +48 dB.
    pub fn makeup_gain_linear(&self) -> f32 {
        db_to_linear(self.makeup_db.min(MAX_MAKEUP_DB))
    }
}

/// The three bands every bound source is split into. Makeup gain is larger
/// for bands with more insertion loss from narrower filtering and heavier
/// compression.
pub const LOW_BAND: BandSpec = BandSpec {
    low_hz: 20.0,
    high_hz: 200.0,
    makeup_db: 20.0,
};
pub const MID_BAND: BandSpec = BandSpec {
    low_hz: 200.0,
    high_hz: 2500.0,
    makeup_db: 35.0,
};
pub const HIGH_BAND: BandSpec = BandSpec {
    low_hz: 2500.0,
    high_hz: 20000.0,
    makeup_db: 40.0,
};

pub const DEFAULT_BANDS: [BandSpec; 3] = [LOW_BAND, MID_BAND, HIGH_BAND];

/// Dynamics compressor parameters as handed to the render host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorSpec {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack_secs: f32,
    pub release_secs: f32,
}

impl CompressorSpec {
    /// Brick-wall configuration used by the limiter: hard knee, 20:1 ratio,
    /// fast attack and release.
    pub fn brick_wall(threshold_db: f32) -> Self {
        Self {
            threshold_db,
            knee_db: 0.0,
            ratio: 20.0,
            attack_secs: 0.001,
            release_secs: 0.1,
        }
    }
}

/// Downward path: reduces levels above a fairly high threshold.
pub const DOWNWARD_COMPRESSOR: CompressorSpec = CompressorSpec {
    threshold_db: -12.0,
    knee_db: 6.0,
    ratio: 4.0,
    attack_secs: 0.003,
    release_secs: 0.1,
};

/// Upward path: ratio below 1 expands quiet signal upward, recovering
/// low-level detail the narrow filters and downward compression would bury.
pub const UPWARD_COMPRESSOR: CompressorSpec = CompressorSpec {
    threshold_db: -40.0,
    knee_db: 6.0,
    ratio: 0.5,
    attack_secs: 0.005,
    release_secs: 0.15,
};

/// Which optional stages are spliced into the shared post-summation path.
///
/// `enabled_globally` governs per-source bypass, not the shared tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingState {
    pub enabled_globally: bool,
    pub high_pass_enabled: bool,
    pub equalizer_enabled: bool,
}

/// One audio-producing source as reported by discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: String,
    pub label: String,
    /// Protected/encrypted sources are never tapped.
    pub protected: bool,
}

impl SourceInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            protected: false,
        }
    }

    pub fn protected(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            protected: true,
        }
    }
}

/// Discrete configuration events delivered over the control channel.
///
/// Events may arrive from more than one origin; duplicates and reordered
/// copies converge to the same effective state.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    SetEnabled(bool),
    SetHighPassEnabled(bool),
    SetEqualizerEnabled(bool),
    SetLimiterThreshold(f32),
    SetEqGain { band_index: usize, gain_db: f32 },
    SetEqGains(Vec<f32>),
    SourceAdded(SourceInfo),
    SourceRemoved(String),
}
