// Shared in-memory render host for the integration tests.
//
// Records every node, link, and graph operation so tests can assert on the
// exact topology the engine describes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use widewave::{BiquadParams, CompressorSpec, HostError, NodeRef, RenderHost, SourceInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Destination,
    Gain(f32),
    Convolver(Vec<f32>),
    Biquad(BiquadParams),
    Compressor(CompressorSpec),
    Tap(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphOp {
    Connect(NodeRef, NodeRef),
    Disconnect(NodeRef, NodeRef),
}

#[derive(Default)]
struct GraphState {
    next_id: u64,
    nodes: HashMap<NodeRef, NodeKind>,
    links: Vec<(NodeRef, NodeRef)>,
    ops: Vec<GraphOp>,
    tap_attempts: Vec<String>,
}

pub struct RecordingHost {
    sample_rate: u32,
    destination: NodeRef,
    fail_convolvers: bool,
    deny_taps: bool,
    state: Mutex<GraphState>,
}

impl RecordingHost {
    pub fn new(sample_rate: u32) -> Self {
        Self::with_flags(sample_rate, false, false)
    }

    /// A host whose convolver primitive always fails, for fallback tests.
    pub fn failing_convolvers(sample_rate: u32) -> Self {
        Self::with_flags(sample_rate, true, false)
    }

    /// A host that refuses every tap attempt.
    pub fn denying_taps(sample_rate: u32) -> Self {
        Self::with_flags(sample_rate, false, true)
    }

    fn with_flags(sample_rate: u32, fail_convolvers: bool, deny_taps: bool) -> Self {
        let mut state = GraphState::default();
        let destination = NodeRef(0);
        state.nodes.insert(destination, NodeKind::Destination);
        state.next_id = 1;
        Self {
            sample_rate,
            destination,
            fail_convolvers,
            deny_taps,
            state: Mutex::new(state),
        }
    }

    /// The destination endpoint, without needing the trait in scope.
    pub fn destination_node(&self) -> NodeRef {
        self.destination
    }

    fn alloc(&self, kind: NodeKind) -> NodeRef {
        let mut state = self.state.lock().unwrap();
        let node = NodeRef(state.next_id);
        state.next_id += 1;
        state.nodes.insert(node, kind);
        node
    }

    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }

    pub fn links(&self) -> Vec<(NodeRef, NodeRef)> {
        self.state.lock().unwrap().links.clone()
    }

    pub fn has_link(&self, from: NodeRef, to: NodeRef) -> bool {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .any(|&(f, t)| f == from && t == to)
    }

    pub fn outputs_of(&self, node: NodeRef) -> Vec<NodeRef> {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|&&(f, _)| f == node)
            .map(|&(_, t)| t)
            .collect()
    }

    pub fn node_kind(&self, node: NodeRef) -> Option<NodeKind> {
        self.state.lock().unwrap().nodes.get(&node).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().unwrap().nodes.len()
    }

    pub fn count_nodes(&self, predicate: impl Fn(&NodeKind) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .nodes
            .values()
            .filter(|kind| predicate(kind))
            .count()
    }

    pub fn tap_attempts(&self) -> Vec<String> {
        self.state.lock().unwrap().tap_attempts.clone()
    }

    pub fn ops(&self) -> Vec<GraphOp> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.lock().unwrap().ops.clear();
    }

    /// Every node reachable from `node` by following links forward.
    pub fn reachable_from(&self, node: NodeRef) -> Vec<NodeRef> {
        let state = self.state.lock().unwrap();
        let mut visited = vec![node];
        let mut queue = vec![node];
        while let Some(current) = queue.pop() {
            for &(from, to) in &state.links {
                if from == current && !visited.contains(&to) {
                    visited.push(to);
                    queue.push(to);
                }
            }
        }
        visited
    }

    pub fn path_exists(&self, from: NodeRef, to: NodeRef) -> bool {
        self.reachable_from(from).contains(&to)
    }
}

impl RenderHost for RecordingHost {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn destination(&self) -> NodeRef {
        self.destination
    }

    fn create_gain(&self, gain: f32) -> Result<NodeRef, HostError> {
        Ok(self.alloc(NodeKind::Gain(gain)))
    }

    fn create_convolver(&self, coefficients: &[f32]) -> Result<NodeRef, HostError> {
        if self.fail_convolvers {
            return Err(HostError::NodeCreation("convolver"));
        }
        Ok(self.alloc(NodeKind::Convolver(coefficients.to_vec())))
    }

    fn create_biquad(&self, params: BiquadParams) -> Result<NodeRef, HostError> {
        Ok(self.alloc(NodeKind::Biquad(params)))
    }

    fn create_compressor(&self, spec: CompressorSpec) -> Result<NodeRef, HostError> {
        Ok(self.alloc(NodeKind::Compressor(spec)))
    }

    fn set_gain(&self, node: NodeRef, gain: f32) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        match state.nodes.get_mut(&node) {
            Some(NodeKind::Gain(value)) => {
                *value = gain;
                Ok(())
            }
            _ => Err(HostError::UnknownNode(node)),
        }
    }

    fn set_biquad_gain_db(&self, node: NodeRef, gain_db: f32) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        match state.nodes.get_mut(&node) {
            Some(NodeKind::Biquad(params)) => {
                params.gain_db = gain_db;
                Ok(())
            }
            _ => Err(HostError::UnknownNode(node)),
        }
    }

    fn set_compressor_threshold(&self, node: NodeRef, threshold_db: f32) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        match state.nodes.get_mut(&node) {
            Some(NodeKind::Compressor(spec)) => {
                spec.threshold_db = threshold_db;
                Ok(())
            }
            _ => Err(HostError::UnknownNode(node)),
        }
    }

    fn connect(&self, from: NodeRef, to: NodeRef) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if !state.nodes.contains_key(&from) {
            return Err(HostError::UnknownNode(from));
        }
        if !state.nodes.contains_key(&to) {
            return Err(HostError::UnknownNode(to));
        }
        state.links.push((from, to));
        state.ops.push(GraphOp::Connect(from, to));
        Ok(())
    }

    fn disconnect(&self, from: NodeRef, to: NodeRef) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        state.links.retain(|&(f, t)| !(f == from && t == to));
        state.ops.push(GraphOp::Disconnect(from, to));
        Ok(())
    }

    fn disconnect_outputs(&self, node: NodeRef) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        let removed: Vec<(NodeRef, NodeRef)> = state
            .links
            .iter()
            .filter(|&&(f, _)| f == node)
            .cloned()
            .collect();
        state.links.retain(|&(f, _)| f != node);
        for (from, to) in removed {
            state.ops.push(GraphOp::Disconnect(from, to));
        }
        Ok(())
    }

    fn tap_source(&self, source: &SourceInfo) -> Result<NodeRef, HostError> {
        {
            let mut state = self.state.lock().unwrap();
            state.tap_attempts.push(source.id.clone());
        }
        if self.deny_taps {
            return Err(HostError::TapUnavailable(
                source.id.clone(),
                "host restriction".to_string(),
            ));
        }
        Ok(self.alloc(NodeKind::Tap(source.id.clone())))
    }
}
