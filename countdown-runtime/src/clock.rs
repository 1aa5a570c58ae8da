//! Periodic clocks that drive the shared scheduler

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::error::ClockError;

/// Period of the shared countdown clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Function invoked on every clock firing
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// A cancellable periodic callback
pub trait Clock: Send + 'static {
    type Handle: Send + 'static;

    /// Start invoking `on_tick` once per `interval`
    fn start(&mut self, interval: Duration, on_tick: TickFn) -> Result<Self::Handle, ClockError>;

    /// Cancel a clock previously returned by `start`
    fn stop(&mut self, handle: Self::Handle);
}

/// Clock backed by a `tokio::time::interval` task
#[derive(Debug, Clone, Default)]
pub struct TokioClock {
    runtime: Option<tokio::runtime::Handle>,
}

impl TokioClock {
    /// Spawn onto whichever runtime is current when the clock starts
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Spawn onto a specific runtime
    pub fn with_handle(runtime: tokio::runtime::Handle) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }
}

impl Clock for TokioClock {
    type Handle = tokio::task::JoinHandle<()>;

    fn start(&mut self, interval: Duration, mut on_tick: TickFn) -> Result<Self::Handle, ClockError> {
        if interval.is_zero() {
            return Err(ClockError::InvalidInterval(interval));
        }
        let runtime = match &self.runtime {
            Some(handle) => handle.clone(),
            None => tokio::runtime::Handle::try_current().map_err(|_| ClockError::NoRuntime)?,
        };

        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(interval);

            // Skip first tick (it fires immediately)
            interval.tick().await;

            loop {
                interval.tick().await;
                on_tick();
            }
        });

        debug!(?interval, "Tokio clock started");
        Ok(handle)
    }

    fn stop(&mut self, handle: Self::Handle) {
        handle.abort();
        debug!("Tokio clock stopped");
    }
}

#[derive(Default)]
struct ManualState {
    next_id: u64,
    running: Option<u64>,
    on_tick: Option<TickFn>,
    starts: usize,
    stops: usize,
}

/// Clock fired explicitly by the host
///
/// Useful when the embedding already owns a frame or event loop. Clones
/// share the same state, so a host can keep one clone and hand another to
/// the scheduler.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one tick. Returns `false` when the clock is not running.
    pub fn fire(&self) -> bool {
        let (id, mut on_tick) = {
            let mut state = self.state();
            match (state.running, state.on_tick.take()) {
                (Some(id), Some(on_tick)) => (id, on_tick),
                _ => return false,
            }
        };

        // The callback may stop (or restart) this clock, so no lock is held here
        on_tick();

        let mut state = self.state();
        if state.running == Some(id) && state.on_tick.is_none() {
            state.on_tick = Some(on_tick);
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.state().running.is_some()
    }

    /// Number of times the clock has been started
    pub fn starts(&self) -> usize {
        self.state().starts
    }

    /// Number of times the clock has been stopped
    pub fn stops(&self) -> usize {
        self.state().stops
    }
}

impl std::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ManualClock")
            .field("running", &state.running)
            .field("starts", &state.starts)
            .field("stops", &state.stops)
            .finish()
    }
}

impl Clock for ManualClock {
    type Handle = u64;

    fn start(&mut self, interval: Duration, on_tick: TickFn) -> Result<Self::Handle, ClockError> {
        if interval.is_zero() {
            return Err(ClockError::InvalidInterval(interval));
        }
        let mut state = self.state();
        state.next_id += 1;
        let id = state.next_id;
        state.running = Some(id);
        state.on_tick = Some(on_tick);
        state.starts += 1;
        Ok(id)
    }

    fn stop(&mut self, handle: Self::Handle) {
        let mut state = self.state();
        if state.running == Some(handle) {
            state.running = None;
            state.on_tick = None;
            state.stops += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, TickFn) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        let on_tick: TickFn = Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, on_tick)
    }

    #[test]
    fn manual_clock_fires_only_while_running() {
        let mut clock = ManualClock::new();
        let (count, on_tick) = counting();

        assert!(!clock.fire());

        let handle = clock.start(TICK_INTERVAL, on_tick).unwrap();
        assert!(clock.is_running());
        assert!(clock.fire());
        assert!(clock.fire());

        clock.stop(handle);
        assert!(!clock.is_running());
        assert!(!clock.fire());
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!((clock.starts(), clock.stops()), (1, 1));
    }

    #[test]
    fn stale_handle_does_not_stop_new_clock() {
        let mut clock = ManualClock::new();
        let (_, first) = counting();
        let (_, second) = counting();

        let old = clock.start(TICK_INTERVAL, first).unwrap();
        clock.stop(old);
        let _new = clock.start(TICK_INTERVAL, second).unwrap();
        clock.stop(old);

        assert!(clock.is_running());
    }

    #[test]
    fn callback_may_stop_its_own_clock() {
        let clock = ManualClock::new();
        let mut inner = clock.clone();
        let handle = Arc::new(Mutex::new(None));
        let handle_in_tick = handle.clone();

        let id = clock
            .clone()
            .start(
                TICK_INTERVAL,
                Box::new(move || {
                    if let Some(id) = handle_in_tick.lock().unwrap().take() {
                        inner.stop(id);
                    }
                }),
            )
            .unwrap();
        *handle.lock().unwrap() = Some(id);

        assert!(clock.fire());
        assert!(!clock.is_running());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let (_, on_tick) = counting();
        let err = ManualClock::new().start(Duration::ZERO, on_tick).unwrap_err();

        assert!(matches!(err, ClockError::InvalidInterval(_)));
    }

    #[test]
    fn tokio_clock_requires_runtime() {
        let (_, on_tick) = counting();
        let err = TokioClock::new().start(TICK_INTERVAL, on_tick).unwrap_err();

        assert!(matches!(err, ClockError::NoRuntime));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_ticks_every_interval() {
        let mut clock = TokioClock::new();
        let (count, on_tick) = counting();

        let handle = clock.start(TICK_INTERVAL, on_tick).unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        clock.stop(handle);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
