//! # Countdown - Shared-Clock Countdown Timers for Rust
//!
//! Render any number of countdowns into display targets, all driven by a
//! single one-second clock.
//!
//! ## Features
//!
//! - **Layout templates**: `"Time Remaining: $h:$m:$s"`, with `$h`, `$m`, `$s` field markers
//! - **Carry-up**: fields missing from the layout fold into the next one (`"$m:$s"` shows 62:05)
//! - **Tick thresholds**: fire a callback once when the countdown reaches a point
//! - **Expiry callbacks**: fire exactly once when a countdown runs out
//! - **One shared clock**: started on the first active countdown, stopped with the last
//! - **Config support**: define countdowns in TOML/YAML, with `${app.key}` placeholders
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use countdown::{CountdownUpdate, CountdownsBuilder, OnTick, Callback, SharedTarget, TextTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let countdowns = CountdownsBuilder::new().build()?;
//!     let banner: SharedTarget = TextTarget::shared("banner");
//!
//!     countdowns.configure(
//!         &banner,
//!         CountdownUpdate::new()
//!             .duration(900)
//!             .layout("Time Remaining: $m:$s")
//!             .on_tick(OnTick::at_or_under(60, Callback::new(|_| {
//!                 println!("One minute left");
//!                 Ok(())
//!             })))
//!             .on_expiry(|target| {
//!                 target.render("Countdown complete");
//!                 Ok(())
//!             }),
//!     )?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/countdowns.toml`:
//!
//! ```toml
//! [scheduler]
//! callback_errors = "isolate"   # or "propagate" (default)
//!
//! [countdowns.sale]
//! duration = "15m"
//! layout = "Sale ends in $m:$s"
//! display_2_digit_minutes = false
//! ```
//!
//! then `countdowns.configure_named("sale", &target, CountdownUpdate::new())`.
//!
//! You can also use environment variables with the `COUNTDOWN_` prefix:
//!
//! ```bash
//! export COUNTDOWN_COUNTDOWNS__SALE__DURATION=120
//! ```

// Re-export core types
pub use countdown_runtime::{
    Callback, CallbackError, CallbackPolicy, Clock, ClockError, CountdownError, CountdownUpdate,
    Countdowns, CountdownsBuilder, Layout, ManualClock, MinutesPadding, OnTick, RenderTarget,
    Segment, SegmentKind, Setting, SharedTarget, TextTarget, TickState, TimeUnit, TokioClock,
    TICK_INTERVAL,
};

// Make countdown_runtime available for lower-level use
pub use countdown_runtime;
