//! Error types for countdown scheduling

use thiserror::Error;

/// Error returned by a user callback (`on_tick` action or `on_expiry`)
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while configuring or ticking countdowns
#[derive(Debug, Error)]
pub enum CountdownError {
    #[error("tick callback failed for {target}")]
    TickCallback {
        target: String,
        #[source]
        source: CallbackError,
    },

    #[error("expiry callback failed for {target}")]
    ExpiryCallback {
        target: String,
        #[source]
        source: CallbackError,
    },

    #[error("failed to start the shared clock")]
    ClockStart(#[from] ClockError),

    #[error("failed to load configuration")]
    Config(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("countdown scheduler lock poisoned")]
    Poisoned,
}

/// Errors raised by a [`Clock`](crate::Clock) implementation
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("no Tokio runtime available to drive the clock")]
    NoRuntime,

    #[error("clock rejected interval of {0:?}")]
    InvalidInterval(std::time::Duration),
}
