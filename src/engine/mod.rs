// Engine module - signal-processing graph core for Widewave
//
// This module describes and mutates a render-host audio graph broken down
// into logical components:
// - types: core data types, control events, and fixed DSP parameters
// - config: persisted configuration consumption and sanitization
// - host: the render-host abstraction the engine drives
// - filter_design: windowed-sinc FIR coefficient synthesis
// - band: crossover band construction (band-pass + parallel dynamics)
// - equalizer: 8-band parametric tone control
// - limiter: brick-wall limiter with threshold-linked makeup gain
// - router: shared post-summation topology and live reconfiguration
// - binding: per-source tap/pre-gain/band lifecycle
// - core: control-event queue and top-level engine state

pub mod band;
pub mod binding;
pub mod config;
pub mod core;
pub mod equalizer;
pub mod filter_design;
pub mod host;
pub mod limiter;
pub mod router;
pub mod types;
pub mod validation;

// Re-export commonly used types for easier imports
pub use band::{BandFilterTopology, CrossoverBand};
pub use binding::MediaBinding;
pub use config::EngineConfig;
pub use core::AudioEngine;
pub use equalizer::Equalizer;
pub use filter_design::{design, FilterSpec};
pub use host::{BiquadKind, BiquadParams, HostError, NodeRef, RenderHost};
pub use limiter::{compensation_gain, Limiter};
pub use router::{Link, SignalRouter};
pub use types::{BandSpec, CompressorSpec, ControlEvent, FilterKind, RoutingState, SourceInfo};
