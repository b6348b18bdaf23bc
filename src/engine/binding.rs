// Per-source lifecycle
//
// One binding per distinct source. The binding exclusively owns its tap,
// pre-gain, and three crossover bands; the shared tail is referenced only
// through the router's summation node.

use anyhow::Result;
use colored::*;
use tracing::{debug, warn};

use super::band::CrossoverBand;
use super::host::{HostError, NodeRef, RenderHost};
use super::types::{SourceInfo, DEFAULT_BANDS};

pub struct MediaBinding {
    source_id: String,
    source: NodeRef,
    pre_gain: NodeRef,
    bands: Vec<CrossoverBand>,
}

impl MediaBinding {
    /// Tap a source and assemble its private processing front-end, fanning
    /// the pre-gain into all bands and summing band outputs into `summing`.
    ///
    /// Returns `Ok(None)` when the source is excluded (protected) or cannot
    /// be tapped; neither case is an error and neither affects other
    /// sources.
    pub fn establish(
        host: &dyn RenderHost,
        info: &SourceInfo,
        summing: NodeRef,
    ) -> Result<Option<Self>> {
        if info.protected {
            debug!(
                "{}: source {} is protected, leaving it unprocessed",
                "BINDING".on_magenta().white(),
                info.id
            );
            return Ok(None);
        }

        let source = match host.tap_source(info) {
            Ok(node) => node,
            Err(err) => {
                warn!(
                    "{}: unable to tap source {}: {}",
                    "BINDING".on_magenta().white(),
                    info.id,
                    err
                );
                return Ok(None);
            }
        };

        // Unity pre-gain; boosting happens downstream, in the bands
        let pre_gain = host.create_gain(1.0)?;

        let mut bands = Vec::with_capacity(DEFAULT_BANDS.len());
        for spec in DEFAULT_BANDS {
            let band = CrossoverBand::build(host, spec)?;
            host.connect(pre_gain, band.input())?;
            host.connect(band.output(), summing)?;
            bands.push(band);
        }

        debug!(
            "{}: wired source {} into {} bands",
            "BINDING".on_magenta().white(),
            info.id,
            bands.len()
        );

        Ok(Some(Self {
            source_id: info.id.clone(),
            source,
            pre_gain,
            bands,
        }))
    }

    /// Binary bypass: when enabled, route source → pre-gain (the persistent
    /// pre-gain → bands wiring restores the processing path exactly); when
    /// disabled, route source straight to destination with zero added
    /// latency or coloration.
    pub fn apply_enabled_state(
        &self,
        host: &dyn RenderHost,
        enabled: bool,
    ) -> Result<(), HostError> {
        host.disconnect_outputs(self.source)?;
        if enabled {
            host.connect(self.source, self.pre_gain)?;
            debug!(
                "{}: source {} routed through processing bands",
                "BINDING".on_magenta().white(),
                self.source_id
            );
        } else {
            host.connect(self.source, host.destination())?;
            debug!(
                "{}: source {} bypassed to destination",
                "BINDING".on_magenta().white(),
                self.source_id
            );
        }
        Ok(())
    }

    /// Disconnect the source and every band output. Nothing is reused across
    /// distinct sources.
    pub fn teardown(&self, host: &dyn RenderHost) -> Result<(), HostError> {
        host.disconnect_outputs(self.source)?;
        for band in &self.bands {
            host.disconnect_outputs(band.output())?;
        }
        Ok(())
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source_node(&self) -> NodeRef {
        self.source
    }

    pub fn pre_gain_node(&self) -> NodeRef {
        self.pre_gain
    }

    pub fn bands(&self) -> &[CrossoverBand] {
        &self.bands
    }
}
