use super::handle::Countdowns;
use crate::clock::{Clock, TokioClock};
use crate::config::{countdown_names, load_toml_config, load_yaml_config, scheduler_settings};
use crate::dispatch::CallbackPolicy;
use crate::error::CountdownError;
use config::Config;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Builder for a shared countdown scheduler
pub struct CountdownsBuilder<C: Clock = TokioClock> {
    config: Arc<Config>,
    clock: C,
    callback_policy: Option<CallbackPolicy>,
}

impl Default for CountdownsBuilder<TokioClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownsBuilder<TokioClock> {
    /// Create a new builder with default config (empty) and a Tokio clock
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create with TOML config file
    pub fn with_toml<P: AsRef<Path>>(path: P) -> Result<Self, CountdownError> {
        Ok(Self::with_config(load_toml_config(path)?))
    }

    /// Create with YAML config file
    pub fn with_yaml<P: AsRef<Path>>(path: P) -> Result<Self, CountdownError> {
        Ok(Self::with_config(load_yaml_config(path)?))
    }

    /// Create with custom config
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            clock: TokioClock::new(),
            callback_policy: None,
        }
    }
}

impl<C: Clock> CountdownsBuilder<C> {
    /// Drive countdowns with a different clock
    pub fn clock<D: Clock>(self, clock: D) -> CountdownsBuilder<D> {
        CountdownsBuilder {
            config: self.config,
            clock,
            callback_policy: self.callback_policy,
        }
    }

    /// Override `scheduler.callback_errors` from the configuration
    pub fn callback_policy(mut self, policy: CallbackPolicy) -> Self {
        self.callback_policy = Some(policy);
        self
    }

    /// Build the scheduler. The clock does not start until a countdown is
    /// activated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use countdown_runtime::{CallbackPolicy, CountdownsBuilder, ManualClock};
    ///
    /// # fn main() -> Result<(), countdown_runtime::CountdownError> {
    /// let countdowns = CountdownsBuilder::new()
    ///     .clock(ManualClock::new())
    ///     .callback_policy(CallbackPolicy::Isolate)
    ///     .build()?;
    ///
    /// assert!(!countdowns.is_clock_running());
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Countdowns<C>, CountdownError> {
        let policy = match self.callback_policy {
            Some(policy) => policy,
            None => scheduler_settings(&self.config)?.callback_errors,
        };

        info!(
            callback_policy = ?policy,
            configured_countdowns = countdown_names(&self.config).len(),
            "Building countdown scheduler"
        );

        Ok(Countdowns::from_parts(self.clock, policy, self.config))
    }
}
