//! Countdown Runtime - Core engine for shared-clock countdown timers
//!
//! Any number of countdowns, each bound to a render target, are driven by one
//! periodic clock. Every tick decrements each active countdown by a second,
//! fires its threshold and expiry callbacks, and re-renders its layout.

mod clock;
mod config;
mod dispatch;
mod error;
mod format;
mod instance;
mod layout;
mod options;
mod scheduler;
mod target;
mod time_unit;

// Re-export public API
pub use clock::{Clock, ManualClock, TickFn, TokioClock, TICK_INTERVAL};
pub use self::config::{
    countdown_names, countdown_update, load_toml_config, load_yaml_config, resolve_config_value,
    scheduler_settings, SchedulerSettings,
};
pub use dispatch::{tick_due, CallbackPolicy, TickState};
pub use error::{CallbackError, ClockError, CountdownError};
pub use format::{format, FormatOptions, MinutesPadding};
pub use layout::{Layout, Segment, SegmentKind, FIELD_MARKER};
pub use options::{Callback, CountdownOptions, CountdownUpdate, OnTick, Setting, DEFAULT_LAYOUT};
pub use scheduler::{Countdowns, CountdownsBuilder};
pub use target::{RenderTarget, SharedTarget, TextTarget};
pub use time_unit::TimeUnit;
