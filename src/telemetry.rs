//! Telemetry helpers for applications embedding `brush-chart`.
//!
//! The engine only emits `tracing` events: lifecycle and rescale decisions at
//! `debug`, per-frame animation and pointer updates at `trace`, rejected input
//! at `warn`. Installing a subscriber stays the host's decision.

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,brush_chart=info";

/// Installs a compact subscriber using [`DEFAULT_FILTER`] as the fallback.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Installs a compact subscriber; `RUST_LOG` wins over `fallback_filter`.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
