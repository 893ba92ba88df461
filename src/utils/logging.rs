// ============================================================================
// Logging Setup
// ============================================================================
//
// The crate only emits `tracing` events. Buffer reallocations and window
// changes are logged at DEBUG, pivot caching at TRACE. Nothing is printed
// unless the host application installs a subscriber; this helper installs
// a plain fmt subscriber filtered by `RUST_LOG`.
//
// ```ignore
// decimal_stats::utils::init_logging();
// // RUST_LOG=decimal_stats=debug cargo run --features logging --example basic_usage
// ```
// ============================================================================

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "decimal_stats=info";

/// Install a global fmt subscriber honouring `RUST_LOG`.
///
/// Returns `false` if another global subscriber was already installed.
pub fn init_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
