//! Tick-threshold and expiry callback dispatch

use serde::Deserialize;
use tracing::debug;

use crate::error::CountdownError;
use crate::options::{Callback, OnTick};
use crate::target::RenderTarget;

/// One-shot state of a countdown's tick callback. Never returns to `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickState {
    #[default]
    Pending,
    Fired,
}

/// What a tick pass does when a callback returns an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackPolicy {
    /// Stop the pass and return the error; later countdowns miss this tick
    #[default]
    Propagate,
    /// Log the error and carry on with the remaining countdowns
    Isolate,
}

/// Whether `on_tick` is due with `remaining` seconds left
pub fn tick_due(on_tick: &OnTick, remaining: i64, state: TickState) -> bool {
    if on_tick.fire_if_under_tick_point {
        remaining <= on_tick.seconds_remaining && state == TickState::Pending
    } else {
        remaining == on_tick.seconds_remaining
    }
}

/// Claim the tick callback if it is due. The state moves to `Fired` here,
/// before the action runs, so a failing action is not retried.
pub(crate) fn claim_tick(
    on_tick: Option<&OnTick>,
    remaining: i64,
    state: &mut TickState,
) -> Option<Callback> {
    let on_tick = on_tick?;
    if !tick_due(on_tick, remaining, *state) {
        return None;
    }

    *state = TickState::Fired;
    Some(on_tick.action.clone())
}

/// Run a claimed tick action against its target
pub(crate) fn run_tick(action: &Callback, target: &dyn RenderTarget) -> Result<(), CountdownError> {
    debug!(target_label = %target.label(), "Firing tick callback");
    action
        .call(target)
        .map_err(|source| CountdownError::TickCallback {
            target: target.label(),
            source,
        })
}

/// Fire the expiry callback, if any
pub(crate) fn fire_expiry(
    on_expiry: Option<&Callback>,
    target: &dyn RenderTarget,
) -> Result<bool, CountdownError> {
    let Some(on_expiry) = on_expiry else {
        return Ok(false);
    };

    debug!(target_label = %target.label(), "Firing expiry callback");
    on_expiry
        .call(target)
        .map_err(|source| CountdownError::ExpiryCallback {
            target: target.label(),
            source,
        })?;
    Ok(true)
}
