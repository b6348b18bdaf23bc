pub mod engine;
pub mod log;

// Re-export engine types for external use and testing
pub use engine::{
    compensation_gain, design, AudioEngine, BandFilterTopology, BandSpec, BiquadKind,
    BiquadParams, CompressorSpec, ControlEvent, CrossoverBand, EngineConfig, Equalizer,
    FilterKind, FilterSpec, HostError, Limiter, Link, MediaBinding, NodeRef, RenderHost,
    RoutingState, SignalRouter, SourceInfo,
};
