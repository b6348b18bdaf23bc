// 8-band parametric equalizer
//
// Eight fixed-frequency peaking filters cascaded in ascending order. Gain is
// the only runtime-mutable parameter; frequency and Q are fixed at
// construction.

use std::sync::Arc;

use tracing::debug;

use super::host::{BiquadParams, HostError, NodeRef, RenderHost};
use super::types::{EQ_BAND_COUNT, EQ_BAND_Q, EQ_FREQUENCIES};
use super::validation::clamp_eq_gain;

pub struct Equalizer {
    host: Arc<dyn RenderHost>,
    input: NodeRef,
    output: NodeRef,
    filters: Vec<NodeRef>,
    gains_db: [f32; EQ_BAND_COUNT],
}

impl Equalizer {
    /// Build the cascade with every band flat (0 dB).
    pub fn build(host: Arc<dyn RenderHost>) -> Result<Self, HostError> {
        let input = host.create_gain(1.0)?;
        let mut filters = Vec::with_capacity(EQ_BAND_COUNT);
        let mut current = input;
        for frequency in EQ_FREQUENCIES {
            let filter = host.create_biquad(BiquadParams::peaking(frequency, EQ_BAND_Q, 0.0))?;
            host.connect(current, filter)?;
            current = filter;
            filters.push(filter);
        }
        Ok(Self {
            host,
            input,
            output: current,
            filters,
            gains_db: [0.0; EQ_BAND_COUNT],
        })
    }

    /// Set one band's gain. Out-of-range indices are a no-op, not an error;
    /// gain is clamped to the supported range.
    pub fn set_gain(&mut self, band_index: usize, gain_db: f32) -> Result<(), HostError> {
        let Some(&filter) = self.filters.get(band_index) else {
            debug!("Ignoring EQ gain for out-of-range band {}", band_index);
            return Ok(());
        };
        let clamped = clamp_eq_gain(gain_db);
        self.host.set_biquad_gain_db(filter, clamped)?;
        self.gains_db[band_index] = clamped;
        Ok(())
    }

    /// Set all band gains at once. Requires exactly 8 entries; anything else
    /// leaves state unchanged.
    pub fn set_gains(&mut self, gains_db: &[f32]) -> Result<(), HostError> {
        if gains_db.len() != EQ_BAND_COUNT {
            debug!(
                "Ignoring EQ gain array of length {} (expected {})",
                gains_db.len(),
                EQ_BAND_COUNT
            );
            return Ok(());
        }
        for (band_index, gain_db) in gains_db.iter().enumerate() {
            self.set_gain(band_index, *gain_db)?;
        }
        Ok(())
    }

    /// The gains currently applied, post-clamping.
    pub fn gains(&self) -> [f32; EQ_BAND_COUNT] {
        self.gains_db
    }

    pub fn input(&self) -> NodeRef {
        self.input
    }

    pub fn output(&self) -> NodeRef {
        self.output
    }
}
