// Shared post-summation routing
//
// The router owns the tail every bound source feeds into: summation point →
// optional high-pass → optional equalizer → limiter → destination. The tail
// for a given state is a pure list of links; applying a state diffs that
// list against what is currently connected and emits only the minimal
// disconnect/connect operations, so re-applying a state never tears the
// graph down or duplicates a path.

use std::sync::Arc;

use tracing::info;

use crate::graph_debug;

use super::config::EngineConfig;
use super::equalizer::Equalizer;
use super::host::{BiquadParams, HostError, NodeRef, RenderHost};
use super::limiter::Limiter;
use super::types::{RoutingState, HIGH_PASS_CUTOFF_HZ, HIGH_PASS_Q, MASTER_SUM_GAIN};

/// One directed stage-to-stage connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub from: NodeRef,
    pub to: NodeRef,
}

pub struct SignalRouter {
    host: Arc<dyn RenderHost>,
    summing: NodeRef,
    /// Created lazily on first enable, bypassed but never destroyed after.
    high_pass: Option<NodeRef>,
    equalizer: Equalizer,
    limiter: Limiter,
    state: RoutingState,
    applied_links: Vec<Link>,
}

impl SignalRouter {
    /// Build the shared tail and wire it for the configured state.
    pub fn build(host: Arc<dyn RenderHost>, config: &EngineConfig) -> Result<Self, HostError> {
        let summing = host.create_gain(MASTER_SUM_GAIN)?;
        let equalizer = Equalizer::build(host.clone())?;
        let limiter = Limiter::build(host.clone(), config.limiter_threshold_db)?;

        let mut router = Self {
            host,
            summing,
            high_pass: None,
            equalizer,
            limiter,
            state: config.routing_state(),
            applied_links: Vec::new(),
        };
        router.equalizer.set_gains(&config.eq_gains)?;
        router.apply(config.routing_state())?;
        Ok(router)
    }

    /// The tail topology for a state, in signal order. Pure; consults only
    /// already-created stage endpoints.
    fn topology(&self, state: RoutingState) -> Vec<Link> {
        let mut links = Vec::with_capacity(4);
        let mut current = self.summing;
        if state.high_pass_enabled {
            if let Some(high_pass) = self.high_pass {
                links.push(Link {
                    from: current,
                    to: high_pass,
                });
                current = high_pass;
            }
        }
        if state.equalizer_enabled {
            links.push(Link {
                from: current,
                to: self.equalizer.input(),
            });
            current = self.equalizer.output();
        }
        links.push(Link {
            from: current,
            to: self.limiter.input(),
        });
        links.push(Link {
            from: self.limiter.output(),
            to: self.host.destination(),
        });
        links
    }

    /// Atomically rewire the tail for `state`. Idempotent: applying the same
    /// state twice leaves an identical, non-duplicated topology.
    pub fn apply(&mut self, state: RoutingState) -> Result<(), HostError> {
        if state.high_pass_enabled && self.high_pass.is_none() {
            let high_pass = self
                .host
                .create_biquad(BiquadParams::high_pass(HIGH_PASS_CUTOFF_HZ, HIGH_PASS_Q))?;
            self.high_pass = Some(high_pass);
            info!("Created high-pass stage at {} Hz", HIGH_PASS_CUTOFF_HZ);
        }

        let desired = self.topology(state);

        let mut disconnected = 0;
        for link in &self.applied_links {
            if !desired.contains(link) {
                self.host.disconnect(link.from, link.to)?;
                disconnected += 1;
            }
        }
        let mut connected = 0;
        for link in &desired {
            if !self.applied_links.contains(link) {
                self.host.connect(link.from, link.to)?;
                connected += 1;
            }
        }
        graph_debug!(
            "Routing state hp={} eq={}: {} disconnects, {} connects",
            state.high_pass_enabled,
            state.equalizer_enabled,
            disconnected,
            connected
        );

        self.applied_links = desired;
        self.state = state;
        Ok(())
    }

    /// The summation node all band outputs feed into.
    pub fn summing_node(&self) -> NodeRef {
        self.summing
    }

    pub fn state(&self) -> RoutingState {
        self.state
    }

    pub fn applied_links(&self) -> &[Link] {
        &self.applied_links
    }

    pub fn high_pass_node(&self) -> Option<NodeRef> {
        self.high_pass
    }

    pub fn equalizer(&self) -> &Equalizer {
        &self.equalizer
    }

    pub fn equalizer_mut(&mut self) -> &mut Equalizer {
        &mut self.equalizer
    }

    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    pub fn limiter_mut(&mut self) -> &mut Limiter {
        &mut self.limiter
    }
}
