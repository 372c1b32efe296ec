//! # Vault Telemetry
//!
//! Logging setup shared by the runtime binary and integration tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vault_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Every `tracing` event from here on is filtered and formatted.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `vaultgate` | Service name stamped on startup logs |
//! | `VG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter directive |
//! | `VG_JSON_LOGS` | `false` | Emit JSON lines instead of plain text |
//! | `VG_LOG_TARGET` | `true` | Include the module target in each line |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging for the process.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let logging = init_logging(&config)?;
    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name,
        _logging: logging,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
    _logging: LoggingGuard,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Span carrying the component that emitted the enclosed events.
///
/// ```rust,ignore
/// let _span = component_span!("vg-02", key = %key).entered();
/// ```
#[macro_export]
macro_rules! component_span {
    ($component:expr) => {
        tracing::info_span!("component", component = $component)
    };
    ($component:expr, $($field:tt)*) => {
        tracing::info_span!("component", component = $component, $($field)*)
    };
}
