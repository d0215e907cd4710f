//! Per-node tracing setup.
//!
//! Dora installs its own global subscriber, so each node binary gets a
//! thread-local one instead and runs inside a `node` span carrying its
//! name. Interleaved output from several nodes stays attributable.

use tracing::span::EnteredSpan;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Keeps the node subscriber and its span active. Hold it for the
/// lifetime of `main`.
pub struct TracingGuard {
    // Declared first so the span exits before the subscriber is removed
    _span: EnteredSpan,
    _subscriber: DefaultGuard,
}

/// Install the subscriber for a node, honouring `RUST_LOG`.
///
/// # Example
/// ```no_run
/// use hand_control_lib::init_tracing;
///
/// fn main() {
///     let _guard = init_tracing("gesture_dispatcher");
///     // Node code here
/// }
/// ```
pub fn init_tracing(node: &str) -> TracingGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(node, env_filter)
}

fn install(node: &str, env_filter: EnvFilter) -> TracingGuard {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(fmt_layer);

    let subscriber_guard = tracing::subscriber::set_default(subscriber);
    let span = tracing::info_span!("node", name = node).entered();

    TracingGuard {
        _span: span,
        _subscriber: subscriber_guard,
    }
}
