use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

/// Global flag to control graph mutation debug logging
pub static GRAPH_DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Set graph debug logging on/off
pub fn set_graph_debug(enabled: bool) {
    GRAPH_DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Check if graph debug logging is enabled
pub fn is_graph_debug_enabled() -> bool {
    GRAPH_DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Install the global tracing subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Graph debug macro - only logs if graph debug is enabled
#[macro_export]
macro_rules! graph_debug {
    ($($arg:tt)*) => {
        if $crate::log::GRAPH_DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
            tracing::debug!($($arg)*);
        }
    };
}
