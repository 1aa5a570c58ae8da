//! Per-countdown options and partial updates

use std::fmt;
use std::sync::Arc;

use crate::error::CallbackError;
use crate::format::{FormatOptions, MinutesPadding};
use crate::target::RenderTarget;

/// Layout used when none is configured
pub const DEFAULT_LAYOUT: &str = "Time Remaining: $m:$s";

/// A user callback, invoked with the countdown's render target
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&dyn RenderTarget) -> Result<(), CallbackError> + Send + Sync>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn RenderTarget) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, target: &dyn RenderTarget) -> Result<(), CallbackError> {
        (self.0)(target)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Threshold callback fired as the countdown passes a point
#[derive(Debug, Clone)]
pub struct OnTick {
    pub seconds_remaining: i64,
    /// `true`: fire once at the first update at or under the threshold.
    /// `false`: fire only when the remaining time equals it exactly.
    pub fire_if_under_tick_point: bool,
    pub action: Callback,
}

impl OnTick {
    /// Fire once when `seconds_remaining` or fewer are left
    pub fn at_or_under(seconds_remaining: i64, action: Callback) -> Self {
        Self {
            seconds_remaining,
            fire_if_under_tick_point: true,
            action,
        }
    }

    /// Fire only when exactly `seconds_remaining` are left
    pub fn exactly_at(seconds_remaining: i64, action: Callback) -> Self {
        Self {
            seconds_remaining,
            fire_if_under_tick_point: false,
            action,
        }
    }
}

/// One field of a [`CountdownUpdate`]
#[derive(Debug, Clone)]
pub enum Setting<T> {
    /// Leave the stored value as it is
    Keep,
    /// Override the stored value
    Set(T),
    /// Reset the stored value to unset
    Clear,
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Keep
    }
}

impl<T> Setting<T> {
    fn apply(self, slot: &mut Option<T>) {
        match self {
            Setting::Keep => {}
            Setting::Set(value) => *slot = Some(value),
            Setting::Clear => *slot = None,
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Setting::Keep)
    }

    fn or(self, earlier: Setting<T>) -> Setting<T> {
        match self {
            Setting::Keep => earlier,
            later => later,
        }
    }
}

/// Partial update merged over a countdown's stored options
#[derive(Debug, Clone, Default)]
pub struct CountdownUpdate {
    pub duration: Setting<i64>,
    pub layout: Setting<String>,
    pub display_two_digit_minutes: Setting<bool>,
    pub minutes_padding: Setting<MinutesPadding>,
    pub on_tick: Setting<OnTick>,
    pub on_expiry: Setting<Callback>,
}

impl CountdownUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time in seconds
    pub fn duration(mut self, seconds: i64) -> Self {
        self.duration = Setting::Set(seconds);
        self
    }

    pub fn clear_duration(mut self) -> Self {
        self.duration = Setting::Clear;
        self
    }

    pub fn layout(mut self, template: impl Into<String>) -> Self {
        self.layout = Setting::Set(template.into());
        self
    }

    pub fn clear_layout(mut self) -> Self {
        self.layout = Setting::Clear;
        self
    }

    pub fn display_two_digit_minutes(mut self, enabled: bool) -> Self {
        self.display_two_digit_minutes = Setting::Set(enabled);
        self
    }

    pub fn clear_display_two_digit_minutes(mut self) -> Self {
        self.display_two_digit_minutes = Setting::Clear;
        self
    }

    pub fn minutes_padding(mut self, padding: MinutesPadding) -> Self {
        self.minutes_padding = Setting::Set(padding);
        self
    }

    pub fn clear_minutes_padding(mut self) -> Self {
        self.minutes_padding = Setting::Clear;
        self
    }

    pub fn on_tick(mut self, on_tick: OnTick) -> Self {
        self.on_tick = Setting::Set(on_tick);
        self
    }

    pub fn clear_on_tick(mut self) -> Self {
        self.on_tick = Setting::Clear;
        self
    }

    pub fn on_expiry<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn RenderTarget) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_expiry = Setting::Set(Callback::new(f));
        self
    }

    pub fn clear_on_expiry(mut self) -> Self {
        self.on_expiry = Setting::Clear;
        self
    }

    /// Combine two updates; fields of `later` that are not `Keep` win
    pub fn overridden_by(self, later: CountdownUpdate) -> Self {
        Self {
            duration: later.duration.or(self.duration),
            layout: later.layout.or(self.layout),
            display_two_digit_minutes: later
                .display_two_digit_minutes
                .or(self.display_two_digit_minutes),
            minutes_padding: later.minutes_padding.or(self.minutes_padding),
            on_tick: later.on_tick.or(self.on_tick),
            on_expiry: later.on_expiry.or(self.on_expiry),
        }
    }
}

/// Options stored on a countdown instance
#[derive(Debug, Clone, Default)]
pub struct CountdownOptions {
    pub duration: Option<i64>,
    pub layout: Option<String>,
    pub display_two_digit_minutes: Option<bool>,
    pub minutes_padding: Option<MinutesPadding>,
    pub on_tick: Option<OnTick>,
    pub on_expiry: Option<Callback>,
}

impl CountdownOptions {
    pub fn merge(&mut self, update: CountdownUpdate) {
        update.duration.apply(&mut self.duration);
        update.layout.apply(&mut self.layout);
        update
            .display_two_digit_minutes
            .apply(&mut self.display_two_digit_minutes);
        update.minutes_padding.apply(&mut self.minutes_padding);
        update.on_tick.apply(&mut self.on_tick);
        update.on_expiry.apply(&mut self.on_expiry);
    }

    /// Remaining seconds; unset counts as zero
    pub fn remaining(&self) -> i64 {
        self.duration.unwrap_or(0)
    }

    pub fn layout_template(&self) -> &str {
        self.layout.as_deref().unwrap_or(DEFAULT_LAYOUT)
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            two_digit_minutes: self.display_two_digit_minutes.unwrap_or(false),
            minutes_padding: self.minutes_padding.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Callback {
        Callback::new(|_| Ok(()))
    }

    #[test]
    fn keep_leaves_existing_values() {
        let mut options = CountdownOptions::default();
        options.merge(CountdownUpdate::new().duration(900).layout("$s"));
        options.merge(CountdownUpdate::new().display_two_digit_minutes(true));

        assert_eq!(options.duration, Some(900));
        assert_eq!(options.layout_template(), "$s");
        assert!(options.format_options().two_digit_minutes);
    }

    #[test]
    fn set_overrides_and_clear_unsets() {
        let mut options = CountdownOptions::default();
        options.merge(
            CountdownUpdate::new()
                .duration(60)
                .layout("$m")
                .on_tick(OnTick::at_or_under(10, noop()))
                .on_expiry(|_| Ok(())),
        );
        options.merge(
            CountdownUpdate::new()
                .duration(30)
                .clear_layout()
                .clear_on_tick()
                .clear_on_expiry(),
        );

        assert_eq!(options.duration, Some(30));
        assert_eq!(options.layout_template(), DEFAULT_LAYOUT);
        assert!(options.on_tick.is_none());
        assert!(options.on_expiry.is_none());
    }

    #[test]
    fn cleared_duration_counts_as_zero() {
        let mut options = CountdownOptions::default();
        options.merge(CountdownUpdate::new().duration(5));
        options.merge(CountdownUpdate::new().clear_duration());

        assert_eq!(options.remaining(), 0);
    }

    #[test]
    fn later_update_wins_except_keep() {
        let from_file = CountdownUpdate::new().duration(900).layout("$m:$s");
        let merged = from_file.overridden_by(CountdownUpdate::new().duration(60).clear_on_tick());

        assert!(matches!(merged.duration, Setting::Set(60)));
        assert!(matches!(merged.layout, Setting::Set(ref l) if l == "$m:$s"));
        assert!(matches!(merged.on_tick, Setting::Clear));
        assert!(merged.on_expiry.is_keep());
    }

    #[test]
    fn defaults() {
        let options = CountdownOptions::default();

        assert_eq!(options.layout_template(), "Time Remaining: $m:$s");
        assert_eq!(options.format_options(), FormatOptions::default());
        assert!(CountdownUpdate::new().duration.is_keep());
    }

    #[test]
    fn tick_constructors_set_mode() {
        assert!(OnTick::at_or_under(5, noop()).fire_if_under_tick_point);
        assert!(!OnTick::exactly_at(5, noop()).fire_if_under_tick_point);
    }
}
