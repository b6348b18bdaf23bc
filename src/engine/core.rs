// Engine control core
//
// Owns the host handle, the shared router, and the per-source binding
// registry, and applies control events one at a time. All graph mutation
// happens here, on the control context, so disconnect/connect sequences are
// never interleaved; the render context consumes topology lock-free on the
// host side.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

use super::binding::MediaBinding;
use super::config::EngineConfig;
use super::host::RenderHost;
use super::router::SignalRouter;
use super::types::{ControlEvent, RoutingState, SourceInfo};

pub struct AudioEngine {
    host: Arc<dyn RenderHost>,
    config: EngineConfig,
    router: SignalRouter,
    bindings: HashMap<String, MediaBinding>,
    event_tx: mpsc::Sender<ControlEvent>,
    event_rx: Arc<Mutex<mpsc::Receiver<ControlEvent>>>,
}

impl AudioEngine {
    /// Build the shared tail and seed all mutable state from a persisted
    /// configuration snapshot.
    pub fn new(host: Arc<dyn RenderHost>, config: EngineConfig) -> Result<Self> {
        let config = config.sanitized();
        let router = SignalRouter::build(host.clone(), &config)?;
        let (event_tx, event_rx) = mpsc::channel(100);

        info!(
            "Audio engine initialized: enabled={} threshold={}dB eq={} hp={}",
            config.enabled, config.limiter_threshold_db, config.eq_enabled, config.hp_enabled
        );

        Ok(Self {
            host,
            config,
            router,
            bindings: HashMap::new(),
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    /// Sender half of the control channel, for discovery and control-message
    /// collaborators.
    pub fn event_sender(&self) -> mpsc::Sender<ControlEvent> {
        self.event_tx.clone()
    }

    /// Enqueue a control event for processing.
    pub async fn send_event(&self, event: ControlEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|err| anyhow::anyhow!("Failed to enqueue control event: {}", err))
    }

    /// Drain and apply all pending control events in arrival order.
    pub async fn process_events(&mut self) -> Result<()> {
        let event_rx = self.event_rx.clone();
        let mut event_rx = event_rx.lock().await;
        while let Ok(event) = event_rx.try_recv() {
            if let Err(err) = self.handle_event(event) {
                error!("Failed to apply control event: {}", err);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: ControlEvent) -> Result<()> {
        match event {
            ControlEvent::SetEnabled(enabled) => {
                self.config.enabled = enabled;
                info!(
                    "Global processing {}",
                    if enabled { "enabled" } else { "bypassed" }
                );
                for binding in self.bindings.values() {
                    binding.apply_enabled_state(self.host.as_ref(), enabled)?;
                }
            }
            ControlEvent::SetHighPassEnabled(enabled) => {
                self.config.hp_enabled = enabled;
                self.router.apply(self.routing_state())?;
            }
            ControlEvent::SetEqualizerEnabled(enabled) => {
                self.config.eq_enabled = enabled;
                self.router.apply(self.routing_state())?;
            }
            ControlEvent::SetLimiterThreshold(threshold_db) => {
                self.router.limiter_mut().set_threshold(threshold_db)?;
                self.config.limiter_threshold_db = self.router.limiter().threshold_db();
            }
            ControlEvent::SetEqGain {
                band_index,
                gain_db,
            } => {
                self.router.equalizer_mut().set_gain(band_index, gain_db)?;
                self.config.eq_gains = self.router.equalizer().gains();
            }
            ControlEvent::SetEqGains(gains_db) => {
                self.router.equalizer_mut().set_gains(&gains_db)?;
                self.config.eq_gains = self.router.equalizer().gains();
            }
            ControlEvent::SourceAdded(info) => {
                self.bind_source(&info)?;
            }
            ControlEvent::SourceRemoved(source_id) => {
                self.unbind_source(&source_id)?;
            }
        }
        Ok(())
    }

    /// Bind a source, idempotently. Protected and untappable sources are
    /// skipped without error.
    pub fn bind_source(&mut self, info: &SourceInfo) -> Result<()> {
        if self.bindings.contains_key(&info.id) {
            debug!("Source {} already bound", info.id);
            return Ok(());
        }
        let Some(binding) =
            MediaBinding::establish(self.host.as_ref(), info, self.router.summing_node())?
        else {
            return Ok(());
        };
        binding.apply_enabled_state(self.host.as_ref(), self.config.enabled)?;
        info!("Bound source {}", info.id);
        self.bindings.insert(info.id.clone(), binding);
        Ok(())
    }

    /// Tear down and forget a source's binding. Unknown sources are a no-op.
    pub fn unbind_source(&mut self, source_id: &str) -> Result<()> {
        let Some(binding) = self.bindings.remove(source_id) else {
            debug!("Source {} not bound, nothing to remove", source_id);
            return Ok(());
        };
        binding.teardown(self.host.as_ref())?;
        info!("Unbound source {}", source_id);
        Ok(())
    }

    fn routing_state(&self) -> RoutingState {
        self.config.routing_state()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn router(&self) -> &SignalRouter {
        &self.router
    }

    pub fn is_bound(&self, source_id: &str) -> bool {
        self.bindings.contains_key(source_id)
    }

    pub fn binding(&self, source_id: &str) -> Option<&MediaBinding> {
        self.bindings.get(source_id)
    }

    pub fn bound_source_count(&self) -> usize {
        self.bindings.len()
    }
}
