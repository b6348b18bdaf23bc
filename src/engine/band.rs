// Crossover band construction
//
// One band = linear-phase band-pass (high-pass FIR feeding low-pass FIR)
// fanned into parallel downward and upward compression paths, remixed,
// then makeup gain and a fixed boost stage.

use anyhow::Result;
use tracing::warn;

use super::filter_design::FilterSpec;
use super::host::{BiquadParams, HostError, NodeRef, RenderHost};
use super::types::{
    BandSpec, BAND_BOOST_LINEAR, DOWNWARD_COMPRESSOR, DOWNWARD_MIX, UPWARD_COMPRESSOR, UPWARD_MIX,
};
use super::validation::validate_band_range;

/// How the band-splitting filters were realized. Decided once at build time,
/// never rediscovered per render block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandFilterTopology {
    /// Two-stage FIR convolution, phase-accurate across band summation.
    LinearPhase,
    /// Two-pole biquad cascade with the same corner frequencies. Less
    /// phase-accurate but functionally equivalent.
    FallbackBiquad,
}

/// A reusable processing unit with one entry and one summed exit point.
#[derive(Debug)]
pub struct CrossoverBand {
    spec: BandSpec,
    topology: BandFilterTopology,
    input: NodeRef,
    output: NodeRef,
}

impl CrossoverBand {
    pub fn build(host: &dyn RenderHost, spec: BandSpec) -> Result<Self> {
        validate_band_range(spec.low_hz, spec.high_hz)?;

        let (input, band_exit, topology) = match build_linear_phase_bandpass(host, &spec) {
            Ok((input, exit)) => (input, exit, BandFilterTopology::LinearPhase),
            Err(err) => {
                warn!(
                    "Linear-phase band-pass {}..{} Hz unavailable ({}), falling back to biquad",
                    spec.low_hz, spec.high_hz, err
                );
                let (input, exit) = build_biquad_bandpass(host, &spec)?;
                (input, exit, BandFilterTopology::FallbackBiquad)
            }
        };

        // Parallel paths on independent copies of the band signal
        let splitter = host.create_gain(1.0)?;
        let down_comp = host.create_compressor(DOWNWARD_COMPRESSOR)?;
        let down_mix = host.create_gain(DOWNWARD_MIX)?;
        let up_comp = host.create_compressor(UPWARD_COMPRESSOR)?;
        let up_mix = host.create_gain(UPWARD_MIX)?;
        let makeup = host.create_gain(spec.makeup_gain_linear())?;
        let boost = host.create_gain(BAND_BOOST_LINEAR)?;

        host.connect(band_exit, splitter)?;
        host.connect(splitter, down_comp)?;
        host.connect(down_comp, down_mix)?;
        host.connect(splitter, up_comp)?;
        host.connect(up_comp, up_mix)?;
        host.connect(down_mix, makeup)?;
        host.connect(up_mix, makeup)?;
        host.connect(makeup, boost)?;

        Ok(Self {
            spec,
            topology,
            input,
            output: boost,
        })
    }

    pub fn input(&self) -> NodeRef {
        self.input
    }

    pub fn output(&self) -> NodeRef {
        self.output
    }

    pub fn spec(&self) -> BandSpec {
        self.spec
    }

    pub fn filter_topology(&self) -> BandFilterTopology {
        self.topology
    }
}

/// High-pass FIR at the low corner feeding a low-pass FIR at the high
/// corner; both are causal two-stage convolutions.
fn build_linear_phase_bandpass(
    host: &dyn RenderHost,
    spec: &BandSpec,
) -> Result<(NodeRef, NodeRef), HostError> {
    let sample_rate = host.sample_rate();
    let high_pass =
        host.create_convolver(&FilterSpec::high_pass(sample_rate, spec.low_hz).design())?;
    let low_pass =
        host.create_convolver(&FilterSpec::low_pass(sample_rate, spec.high_hz).design())?;
    host.connect(high_pass, low_pass)?;
    Ok((high_pass, low_pass))
}

fn build_biquad_bandpass(
    host: &dyn RenderHost,
    spec: &BandSpec,
) -> Result<(NodeRef, NodeRef), HostError> {
    let high_pass = host.create_biquad(BiquadParams::high_pass(spec.low_hz, 1.0))?;
    let low_pass = host.create_biquad(BiquadParams::low_pass(spec.high_hz, 1.0))?;
    host.connect(high_pass, low_pass)?;
    Ok((high_pass, low_pass))
}
