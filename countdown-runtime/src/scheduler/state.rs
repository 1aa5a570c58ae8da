use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, Weak};

use tracing::{debug, error, info, warn};

use crate::clock::{Clock, TICK_INTERVAL};
use crate::dispatch::{self, CallbackPolicy, TickState};
use crate::error::{ClockError, CountdownError};
use crate::instance::{CountdownInstance, Step};
use crate::options::{Callback, CountdownUpdate};
use crate::target::{SharedTarget, TargetKey};

pub(crate) type SharedState<C> = Mutex<SchedulerState<C>>;

/// Everything the shared clock drives: the countdown registry, the active
/// set and the clock handle.
///
/// Invariant: `clock_handle` is `Some` iff `active` is non-empty.
pub(crate) struct SchedulerState<C: Clock> {
    /// One entry per tagged target
    instances: HashMap<TargetKey, CountdownInstance>,
    /// Targets receiving ticks, in activation order
    active: Vec<TargetKey>,
    next_id: u64,
    clock: C,
    clock_handle: Option<C::Handle>,
    policy: CallbackPolicy,
    this: Weak<SharedState<C>>,
}

/// Result of the first, locked half of an update
struct Prepared {
    id: u64,
    target: SharedTarget,
    tick: Option<Callback>,
}

/// A countdown that has already been removed and still owes its callback
struct Expired {
    target: SharedTarget,
    on_expiry: Option<Callback>,
}

impl<C: Clock> SchedulerState<C> {
    pub(crate) fn new(clock: C, policy: CallbackPolicy, this: Weak<SharedState<C>>) -> Self {
        Self {
            instances: HashMap::new(),
            active: Vec::new(),
            next_id: 0,
            clock,
            clock_handle: None,
            policy,
            this,
        }
    }

    /// Create the countdown for `target` if needed and merge `update` into it
    fn tag(&mut self, target: &SharedTarget, update: CountdownUpdate) -> TargetKey {
        let key = TargetKey::of(target);
        let next_id = &mut self.next_id;
        let instance = self.instances.entry(key).or_insert_with(|| {
            *next_id += 1;
            debug!(target_label = %target.label(), "Creating countdown");
            CountdownInstance::new(*next_id, target.clone())
        });
        instance.merge(update);
        key
    }

    /// Remove the countdown for `target` and clear its content.
    /// Returns `false` when the target has no countdown.
    pub(crate) fn destroy(&mut self, target: &SharedTarget) -> bool {
        let key = TargetKey::of(target);
        let Some(instance) = self.instances.remove(&key) else {
            return false;
        };

        self.active.retain(|k| *k != key);
        instance.target.clear();
        debug!(target_label = %instance.target.label(), "Countdown destroyed");
        self.evaluate_stop();
        true
    }

    /// Stop the clock and drop every countdown without firing callbacks.
    /// Rendered content is left in place.
    pub(crate) fn shutdown(&mut self) {
        self.active.clear();
        self.instances.clear();
        self.evaluate_stop();
    }

    /// Activate the countdown if it has time left, compile its layout and
    /// claim a due tick callback.
    fn prepare(&mut self, key: TargetKey) -> Result<Option<Prepared>, CountdownError> {
        let needs_activation = match self.instances.get(&key) {
            Some(instance) => !instance.active && instance.remaining() > 0,
            None => return Ok(None),
        };
        if needs_activation {
            self.activate()?;
            self.active.push(key);
            if let Some(instance) = self.instances.get_mut(&key) {
                instance.active = true;
                debug!(
                    target_label = %instance.target.label(),
                    duration = instance.remaining(),
                    "Countdown activated"
                );
            }
        }

        let Some(instance) = self.instances.get_mut(&key) else {
            return Ok(None);
        };
        let tick = instance.prepare();
        Ok(Some(Prepared {
            id: instance.id,
            target: instance.target.clone(),
            tick,
        }))
    }

    /// Render and decrement the countdown prepared as `id`. Skipped when a
    /// callback destroyed or replaced it in the meantime.
    fn finish(&mut self, key: TargetKey, id: u64) -> Option<Expired> {
        let instance = self.instances.get_mut(&key).filter(|instance| instance.id == id)?;
        match instance.step() {
            Step::Continue => None,
            Step::Expired => self.expire(key),
        }
    }

    /// Deactivate and forget the countdown, handing back its expiry callback.
    /// Removal comes first so the callback runs at most once.
    fn expire(&mut self, key: TargetKey) -> Option<Expired> {
        self.active.retain(|k| *k != key);
        let instance = self.instances.remove(&key)?;
        debug!(target_label = %instance.target.label(), "Countdown expired");
        self.evaluate_stop();

        Some(Expired {
            target: instance.target,
            on_expiry: instance.options.on_expiry,
        })
    }

    fn activate(&mut self) -> Result<(), ClockError> {
        if self.clock_handle.is_some() {
            return Ok(());
        }

        let this = self.this.clone();
        let handle = self
            .clock
            .start(TICK_INTERVAL, Box::new(move || run_clock_tick(&this)))?;
        self.clock_handle = Some(handle);
        info!(interval = ?TICK_INTERVAL, "Shared countdown clock started");
        Ok(())
    }

    fn evaluate_stop(&mut self) {
        if !self.active.is_empty() {
            return;
        }
        if let Some(handle) = self.clock_handle.take() {
            self.clock.stop(handle);
            info!("Shared countdown clock stopped");
        }
    }

    fn is_active_key(&self, key: TargetKey) -> bool {
        self.instances.get(&key).is_some_and(|instance| instance.active)
    }

    pub(crate) fn has_countdown(&self, target: &SharedTarget) -> bool {
        self.instances.contains_key(&TargetKey::of(target))
    }

    pub(crate) fn is_active(&self, target: &SharedTarget) -> bool {
        self.is_active_key(TargetKey::of(target))
    }

    pub(crate) fn remaining(&self, target: &SharedTarget) -> Option<i64> {
        self.instances
            .get(&TargetKey::of(target))
            .map(CountdownInstance::remaining)
    }

    pub(crate) fn tick_state(&self, target: &SharedTarget) -> Option<TickState> {
        self.instances
            .get(&TargetKey::of(target))
            .map(|instance| instance.tick_state)
    }

    pub(crate) fn segment_count(&self, target: &SharedTarget) -> Option<usize> {
        self.instances
            .get(&TargetKey::of(target))
            .and_then(CountdownInstance::layout)
            .map(|layout| layout.segments().len())
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn is_clock_running(&self) -> bool {
        self.clock_handle.is_some()
    }
}

impl<C: Clock> Drop for SchedulerState<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.clock_handle.take() {
            self.clock.stop(handle);
            info!("Countdown scheduler dropped, shared clock stopped");
        }
    }
}

pub(crate) fn lock<C: Clock>(
    state: &SharedState<C>,
) -> Result<MutexGuard<'_, SchedulerState<C>>, CountdownError> {
    state.lock().map_err(|_| CountdownError::Poisoned)
}

/// Tag `target` (if needed), merge `update` and run one update for it
pub(crate) fn configure<C: Clock>(
    state: &SharedState<C>,
    target: &SharedTarget,
    update: CountdownUpdate,
) -> Result<(), CountdownError> {
    let key = lock(state)?.tag(target, update);
    run_update(state, key)
}

/// Process every active countdown once, newest activation first
pub(crate) fn tick<C: Clock>(state: &SharedState<C>) -> Result<(), CountdownError> {
    let (snapshot, policy) = {
        let guard = lock(state)?;
        let snapshot: Vec<TargetKey> = guard.active.iter().rev().copied().collect();
        (snapshot, guard.policy)
    };

    for key in snapshot {
        if !lock(state)?.is_active_key(key) {
            continue;
        }
        match run_update(state, key) {
            Ok(()) => {}
            Err(
                err @ (CountdownError::TickCallback { .. } | CountdownError::ExpiryCallback { .. }),
            ) if policy == CallbackPolicy::Isolate => {
                warn!(error = %err, source = ?std::error::Error::source(&err), "Countdown callback failed, continuing tick");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// One update: prepare, tick action, finish, expiry callback.
///
/// The scheduler is locked only for the prepare and finish halves, so
/// callbacks may use the scheduler themselves. A tick action error aborts
/// the update before render and decrement.
fn run_update<C: Clock>(state: &SharedState<C>, key: TargetKey) -> Result<(), CountdownError> {
    let prepared = lock(state)?.prepare(key)?;
    let Some(prepared) = prepared else {
        return Ok(());
    };

    if let Some(action) = &prepared.tick {
        dispatch::run_tick(action, prepared.target.as_ref())?;
    }

    let expired = lock(state)?.finish(key, prepared.id);
    if let Some(expired) = expired {
        dispatch::fire_expiry(expired.on_expiry.as_ref(), expired.target.as_ref())?;
    }
    Ok(())
}

/// Body of the shared clock callback. Errors have no caller to return to
/// here, so they are logged.
fn run_clock_tick<C: Clock>(this: &Weak<SharedState<C>>) {
    let Some(state) = this.upgrade() else {
        return;
    };
    if let Err(err) = tick(&*state) {
        error!(error = %err, source = ?std::error::Error::source(&err), "Countdown tick aborted");
    }
}
