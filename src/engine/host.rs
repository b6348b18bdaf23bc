// Render host abstraction
//
// The hosting runtime owns the real-time rendering graph. The engine only
// describes topology and per-stage parameters through this trait; node
// endpoints are opaque ids allocated by the host, never pointers into the
// render graph. Parameter writes take effect no later than the host's next
// processed block.

use thiserror::Error;

use super::types::{CompressorSpec, SourceInfo};

/// Opaque handle to a host-owned node endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(pub u64);

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadKind {
    Lowpass,
    Highpass,
    Peaking,
}

/// Parameters for a host biquad filter stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadParams {
    pub kind: BiquadKind,
    pub frequency_hz: f32,
    pub q: f32,
    pub gain_db: f32,
}

impl BiquadParams {
    pub fn low_pass(frequency_hz: f32, q: f32) -> Self {
        Self {
            kind: BiquadKind::Lowpass,
            frequency_hz,
            q,
            gain_db: 0.0,
        }
    }

    pub fn high_pass(frequency_hz: f32, q: f32) -> Self {
        Self {
            kind: BiquadKind::Highpass,
            frequency_hz,
            q,
            gain_db: 0.0,
        }
    }

    pub fn peaking(frequency_hz: f32, q: f32, gain_db: f32) -> Self {
        Self {
            kind: BiquadKind::Peaking,
            frequency_hz,
            q,
            gain_db,
        }
    }
}

/// Errors surfaced at the host boundary.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host could not allocate a {0} node")]
    NodeCreation(&'static str),
    #[error("source {0} cannot be tapped: {1}")]
    TapUnavailable(String, String),
    #[error("unknown node endpoint {0}")]
    UnknownNode(NodeRef),
}

/// Primitive-node factory and connect/disconnect relation supplied by the
/// hosting runtime.
///
/// All mutations arrive serialized from the engine's control context; the
/// host applies them at its own block boundaries, so implementations only
/// need interior synchronization against their render path.
pub trait RenderHost: Send + Sync {
    /// Ambient sample rate, fixed for the audio session.
    fn sample_rate(&self) -> u32;

    /// The final output endpoint.
    fn destination(&self) -> NodeRef;

    fn create_gain(&self, gain: f32) -> Result<NodeRef, HostError>;

    /// Finite-impulse-response convolution with an explicit coefficient
    /// buffer.
    fn create_convolver(&self, coefficients: &[f32]) -> Result<NodeRef, HostError>;

    fn create_biquad(&self, params: BiquadParams) -> Result<NodeRef, HostError>;

    fn create_compressor(&self, spec: CompressorSpec) -> Result<NodeRef, HostError>;

    fn set_gain(&self, node: NodeRef, gain: f32) -> Result<(), HostError>;

    fn set_biquad_gain_db(&self, node: NodeRef, gain_db: f32) -> Result<(), HostError>;

    fn set_compressor_threshold(&self, node: NodeRef, threshold_db: f32)
        -> Result<(), HostError>;

    fn connect(&self, from: NodeRef, to: NodeRef) -> Result<(), HostError>;

    fn disconnect(&self, from: NodeRef, to: NodeRef) -> Result<(), HostError>;

    /// Remove every outgoing link of `node`.
    fn disconnect_outputs(&self, node: NodeRef) -> Result<(), HostError>;

    /// Expose a page source's samples as a node, or fail if the source is
    /// unavailable or restricted.
    fn tap_source(&self, source: &SourceInfo) -> Result<NodeRef, HostError>;
}
