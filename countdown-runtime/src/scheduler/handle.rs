use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use config::Config;

use super::state::{self, SchedulerState, SharedState};
use crate::clock::{Clock, TokioClock};
use crate::config::countdown_update;
use crate::dispatch::{CallbackPolicy, TickState};
use crate::error::CountdownError;
use crate::options::CountdownUpdate;
use crate::target::SharedTarget;

/// Handle to a shared countdown scheduler
///
/// All countdowns configured through one `Countdowns` (or its clones) share
/// a single clock. The clock starts with the first active countdown and
/// stops when the last one expires or is destroyed.
///
/// Callbacks run with the scheduler unlocked, so a callback may configure,
/// destroy or query countdowns through a clone of this handle.
pub struct Countdowns<C: Clock = TokioClock> {
    state: Arc<SharedState<C>>,
    config: Arc<Config>,
}

impl<C: Clock> Clone for Countdowns<C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: Clock> Countdowns<C> {
    /// Create a scheduler driven by `clock` with default settings
    pub fn new(clock: C) -> Self {
        Self::from_parts(clock, CallbackPolicy::default(), Arc::new(Config::default()))
    }

    pub(crate) fn from_parts(clock: C, policy: CallbackPolicy, config: Arc<Config>) -> Self {
        let state = Arc::new_cyclic(|this| Mutex::new(SchedulerState::new(clock, policy, this.clone())));
        Self { state, config }
    }

    fn read(&self) -> MutexGuard<'_, SchedulerState<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start or reconfigure the countdown on `target`.
    ///
    /// The first call tags the target and compiles its layout. Every call
    /// merges `update` over the stored options and runs one update pass:
    /// tick callback, render, expiry check, then a one-second decrement.
    /// A countdown is activated (and the shared clock started) once its
    /// duration is above zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use countdown_runtime::{Countdowns, CountdownUpdate, ManualClock, SharedTarget, TextTarget};
    ///
    /// # fn main() -> Result<(), countdown_runtime::CountdownError> {
    /// let clock = ManualClock::new();
    /// let countdowns = Countdowns::new(clock.clone());
    /// let banner = TextTarget::shared("banner");
    /// let target: SharedTarget = banner.clone();
    ///
    /// countdowns.configure(&target, CountdownUpdate::new().duration(125).layout("$m:$s"))?;
    /// assert_eq!(banner.content(), "2:05");
    ///
    /// clock.fire();
    /// assert_eq!(banner.content(), "2:04");
    /// # Ok(())
    /// # }
    /// ```
    pub fn configure(&self, target: &SharedTarget, update: CountdownUpdate) -> Result<(), CountdownError> {
        state::configure(&*self.state, target, update)
    }

    /// Configure `target` from the `[countdowns.<name>]` table of the loaded
    /// configuration. Non-`Keep` fields of `overrides` (callbacks, usually)
    /// take precedence over the file.
    pub fn configure_named(
        &self,
        name: &str,
        target: &SharedTarget,
        overrides: CountdownUpdate,
    ) -> Result<(), CountdownError> {
        let update = countdown_update(&self.config, name)?.overridden_by(overrides);
        self.configure(target, update)
    }

    /// Remove the countdown from `target` and clear its content.
    /// Returns `false` if the target had no countdown.
    pub fn destroy(&self, target: &SharedTarget) -> Result<bool, CountdownError> {
        Ok(state::lock(&*self.state)?.destroy(target))
    }

    /// Run one tick over every active countdown.
    ///
    /// The shared clock calls this on its own; hosts only need it when they
    /// drive countdowns without a running clock.
    pub fn tick(&self) -> Result<(), CountdownError> {
        state::tick(&*self.state)
    }

    /// Stop the clock and forget every countdown without firing callbacks
    pub fn shutdown(&self) -> Result<(), CountdownError> {
        state::lock(&*self.state)?.shutdown();
        Ok(())
    }

    /// Whether `target` carries a countdown (active or not)
    pub fn has_countdown(&self, target: &SharedTarget) -> bool {
        self.read().has_countdown(target)
    }

    /// Whether `target` is receiving ticks
    pub fn is_active(&self, target: &SharedTarget) -> bool {
        self.read().is_active(target)
    }

    /// Seconds left on `target`'s countdown, after its last decrement
    pub fn remaining(&self, target: &SharedTarget) -> Option<i64> {
        self.read().remaining(target)
    }

    pub fn tick_state(&self, target: &SharedTarget) -> Option<TickState> {
        self.read().tick_state(target)
    }

    /// Number of compiled layout segments for `target`
    pub fn segment_count(&self, target: &SharedTarget) -> Option<usize> {
        self.read().segment_count(target)
    }

    pub fn active_count(&self) -> usize {
        self.read().active_count()
    }

    pub fn is_clock_running(&self) -> bool {
        self.read().is_clock_running()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Countdowns<TokioClock> {
    fn default() -> Self {
        Self::new(TokioClock::new())
    }
}
