//! Per-target countdown state

use tracing::{debug, trace};

use crate::dispatch::{self, TickState};
use crate::format;
use crate::layout::Layout;
use crate::options::{Callback, CountdownOptions, CountdownUpdate};
use crate::target::SharedTarget;

/// Result of the second half of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Rendered and decremented
    Continue,
    /// Reached zero while active; the caller deactivates it and runs expiry
    Expired,
}

/// Countdown state attached to one render target
pub(crate) struct CountdownInstance {
    /// Distinguishes this instance from a later one on the same target
    pub(crate) id: u64,
    pub(crate) target: SharedTarget,
    pub(crate) options: CountdownOptions,
    pub(crate) tick_state: TickState,
    pub(crate) active: bool,
    /// Compiled on the first update and kept for the instance's lifetime
    layout: Option<Layout>,
}

impl CountdownInstance {
    pub(crate) fn new(id: u64, target: SharedTarget) -> Self {
        Self {
            id,
            target,
            options: CountdownOptions::default(),
            tick_state: TickState::Pending,
            active: false,
            layout: None,
        }
    }

    pub(crate) fn merge(&mut self, update: CountdownUpdate) {
        self.options.merge(update);
    }

    pub(crate) fn remaining(&self) -> i64 {
        self.options.remaining()
    }

    pub(crate) fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// First half of an update: compile the layout if needed and claim the
    /// tick callback when it is due. The caller runs the returned action
    /// before calling [`step`](Self::step).
    pub(crate) fn prepare(&mut self) -> Option<Callback> {
        if self.layout.is_none() {
            self.layout = Some(Layout::compile(self.options.layout_template()));
        }

        let remaining = self.remaining();
        let action = dispatch::claim_tick(self.options.on_tick.as_ref(), remaining, &mut self.tick_state)?;
        debug!(target_label = %self.target.label(), remaining, "Tick callback due");
        Some(action)
    }

    /// Second half of an update: render, expiry check, decrement
    pub(crate) fn step(&mut self) -> Step {
        let remaining = self.remaining();
        if remaining >= 0 {
            self.render(remaining);
        }
        if remaining <= 0 && self.active {
            return Step::Expired;
        }

        self.options.duration = Some(remaining - 1);
        Step::Continue
    }

    fn render(&mut self, remaining: i64) {
        let format_options = self.options.format_options();
        if let Some(layout) = self.layout.as_mut() {
            format::format(remaining, layout, format_options);
            let text = layout.render();
            trace!(target_label = %self.target.label(), %text, "Rendering countdown");
            self.target.render(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OnTick;
    use crate::target::TextTarget;
    use std::sync::Arc;

    fn instance(update: CountdownUpdate) -> (Arc<TextTarget>, CountdownInstance) {
        let target = TextTarget::shared("t");
        let mut instance = CountdownInstance::new(1, target.clone());
        instance.merge(update);
        (target, instance)
    }

    fn advance(instance: &mut CountdownInstance) -> Step {
        instance.prepare();
        instance.step()
    }

    #[test]
    fn renders_then_decrements() {
        let (target, mut instance) = instance(CountdownUpdate::new().duration(125).layout("$m:$s"));
        instance.active = true;

        assert_eq!(advance(&mut instance), Step::Continue);
        assert_eq!(target.content(), "2:05");
        assert_eq!(instance.remaining(), 124);
    }

    #[test]
    fn active_instance_expires_at_zero_after_rendering_it() {
        let (target, mut instance) = instance(CountdownUpdate::new().duration(1).layout("$m:$s"));
        instance.active = true;

        assert_eq!(advance(&mut instance), Step::Continue);
        assert_eq!(advance(&mut instance), Step::Expired);
        assert_eq!(target.content(), "0:00");
        assert_eq!(instance.remaining(), 0);
    }

    #[test]
    fn inactive_instance_never_expires() {
        let (target, mut instance) = instance(CountdownUpdate::new().duration(0));

        assert_eq!(advance(&mut instance), Step::Continue);
        assert_eq!(target.content(), "Time Remaining: 0:00");
        assert_eq!(instance.remaining(), -1);
    }

    #[test]
    fn layout_is_compiled_once() {
        let (target, mut instance) = instance(CountdownUpdate::new().duration(90).layout("$s"));
        advance(&mut instance);
        instance.merge(CountdownUpdate::new().layout("$m:$s"));
        advance(&mut instance);

        assert_eq!(target.content(), "89");
        assert_eq!(instance.layout().unwrap().segments().len(), 3);
    }

    #[test]
    fn prepare_claims_due_tick_without_rendering() {
        let (target, mut instance) = instance(
            CountdownUpdate::new()
                .duration(10)
                .on_tick(OnTick::at_or_under(10, Callback::new(|_| Ok(())))),
        );

        assert!(instance.prepare().is_some());
        assert!(target.content().is_empty());
        assert_eq!(instance.remaining(), 10);
        assert_eq!(instance.tick_state, TickState::Fired);

        assert!(instance.prepare().is_none());
    }
}
