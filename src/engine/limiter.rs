// Brick-wall limiter with threshold-linked makeup gain
//
// Lowering the threshold reduces average output level, so compensation gain
// is added in lock-step to keep perceived loudness roughly constant while
// transient peaks are still caught at the ceiling.

use std::sync::Arc;

use tracing::{debug, warn};

use super::host::{HostError, NodeRef, RenderHost};
use super::types::{CompressorSpec, LIMITER_CEILING, LIMITER_COMPENSATION_CAP_DB};
use super::validation::{db_to_linear, validate_safe_float};

/// Derived compensation gain for a limiter threshold. Never negative, capped
/// at +24 dB.
pub fn compensation_gain(threshold_db: f32) -> f32 {
    let compensation_db = (-threshold_db).clamp(0.0, LIMITER_COMPENSATION_CAP_DB);
    db_to_linear(compensation_db)
}

/// Always the last stage before the destination: input → brick-wall
/// compressor → compensation gain → 0.99 ceiling trim.
pub struct Limiter {
    host: Arc<dyn RenderHost>,
    input: NodeRef,
    compressor: NodeRef,
    compensation: NodeRef,
    output: NodeRef,
    threshold_db: f32,
}

impl Limiter {
    pub fn build(host: Arc<dyn RenderHost>, threshold_db: f32) -> Result<Self, HostError> {
        let input = host.create_gain(1.0)?;
        let compressor = host.create_compressor(CompressorSpec::brick_wall(threshold_db))?;
        let compensation = host.create_gain(compensation_gain(threshold_db))?;
        let ceiling = host.create_gain(LIMITER_CEILING)?;

        host.connect(input, compressor)?;
        host.connect(compressor, compensation)?;
        host.connect(compensation, ceiling)?;

        Ok(Self {
            host,
            input,
            compressor,
            compensation,
            output: ceiling,
            threshold_db,
        })
    }

    /// Move the threshold and recompute compensation in the same step; the
    /// compensation gain is never set independently.
    pub fn set_threshold(&mut self, threshold_db: f32) -> Result<(), HostError> {
        if validate_safe_float(threshold_db, "limiter threshold").is_err() {
            warn!("Ignoring invalid limiter threshold {}", threshold_db);
            return Ok(());
        }
        self.threshold_db = threshold_db;
        self.host
            .set_compressor_threshold(self.compressor, threshold_db)?;
        let gain = compensation_gain(threshold_db);
        self.host.set_gain(self.compensation, gain)?;
        debug!(
            "Limiter threshold {} dB, compensation x{:.3}",
            threshold_db, gain
        );
        Ok(())
    }

    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    pub fn compensation_gain_linear(&self) -> f32 {
        compensation_gain(self.threshold_db)
    }

    pub fn input(&self) -> NodeRef {
        self.input
    }

    pub fn output(&self) -> NodeRef {
        self.output
    }
}
