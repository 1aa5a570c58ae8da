//! Countdowns driven by the Tokio clock, under paused time

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use countdown::{
    Callback, ClockError, CountdownError, CountdownUpdate, CountdownsBuilder, OnTick, SharedTarget,
    TextTarget,
};

fn target(name: &str) -> (Arc<TextTarget>, SharedTarget) {
    let text = TextTarget::shared(name);
    let shared: SharedTarget = text.clone();
    (text, shared)
}

#[tokio::test(start_paused = true)]
async fn counts_down_and_expires_on_the_shared_clock() {
    let countdowns = CountdownsBuilder::new().build().unwrap();
    let (text, t) = target("banner");
    let expired = Arc::new(AtomicUsize::new(0));
    let expired_in_callback = expired.clone();

    countdowns
        .configure(
            &t,
            CountdownUpdate::new()
                .duration(3)
                .layout("$m:$s")
                .on_expiry(move |_| {
                    expired_in_callback.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
        )
        .unwrap();
    assert_eq!(text.content(), "0:03");
    assert!(countdowns.is_clock_running());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(text.content(), "0:02");

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(text.content(), "0:00");
    assert_eq!(expired.load(Ordering::SeqCst), 1);
    assert!(!countdowns.is_clock_running());
    assert!(!countdowns.has_countdown(&t));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn one_clock_drives_several_targets() {
    let countdowns = CountdownsBuilder::new().build().unwrap();
    let (first_text, first) = target("first");
    let (second_text, second) = target("second");
    let warned = Arc::new(AtomicUsize::new(0));
    let warned_in_callback = warned.clone();

    countdowns
        .configure(&first, CountdownUpdate::new().duration(5).layout("$s"))
        .unwrap();
    countdowns
        .configure(
            &second,
            CountdownUpdate::new()
                .duration(65)
                .layout("$m:$s")
                .on_tick(OnTick::at_or_under(
                    63,
                    Callback::new(move |_| {
                        warned_in_callback.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
                )),
        )
        .unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(first_text.content(), "03");
    assert_eq!(second_text.content(), "1:03");
    assert_eq!(warned.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!countdowns.has_countdown(&first));
    assert_eq!(countdowns.active_count(), 1);
    assert!(countdowns.is_clock_running());

    countdowns.destroy(&second).unwrap();
    assert!(second_text.content().is_empty());
    assert!(!countdowns.is_clock_running());
}

#[test]
fn clock_start_failure_reaches_the_caller() {
    let countdowns = CountdownsBuilder::new().build().unwrap();
    let (_, t) = target("orphan");

    let err = countdowns
        .configure(&t, CountdownUpdate::new().duration(5))
        .unwrap_err();

    assert!(matches!(err, CountdownError::ClockStart(ClockError::NoRuntime)));
    assert!(!countdowns.is_active(&t));
    assert_eq!(countdowns.active_count(), 0);
}
