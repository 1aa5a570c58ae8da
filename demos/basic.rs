use countdown::{Callback, CountdownUpdate, CountdownsBuilder, OnTick, RenderTarget, SharedTarget};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Prints every render on its own line
struct Terminal;

impl RenderTarget for Terminal {
    fn render(&self, content: &str) {
        println!("{}", content);
    }

    fn clear(&self) {
        println!();
    }

    fn label(&self) -> String {
        "terminal".to_string()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚀 Counting down 10 seconds...\n");

    let countdowns = CountdownsBuilder::new().build()?;
    let terminal: SharedTarget = Arc::new(Terminal);

    countdowns.configure(
        &terminal,
        CountdownUpdate::new()
            .duration(10)
            .layout("Time Remaining: $m:$s")
            .on_tick(OnTick::at_or_under(
                5,
                Callback::new(|target| {
                    println!("⚠️  [{}] five seconds left", target.label());
                    Ok(())
                }),
            ))
            .on_expiry(|target| {
                target.render("✅ Countdown complete");
                Ok(())
            }),
    )?;

    while countdowns.is_clock_running() {
        tokio::time::sleep(tokio::time::Duration::from_millis(250)).await;
    }

    Ok(())
}
