use countdown::countdown_runtime::countdown_names;
use countdown::{CountdownUpdate, CountdownsBuilder, SharedTarget, TextTarget};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let countdowns = CountdownsBuilder::with_toml(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../demos/config/countdowns.toml"
    ))?.build()?;

    let mut targets = Vec::new();
    for name in countdown_names(countdowns.config()) {
        let text = TextTarget::shared(name.clone());
        let target: SharedTarget = text.clone();
        countdowns.configure_named(
            &name,
            &target,
            CountdownUpdate::new().on_expiry(|target| {
                info!(countdown = %target.label(), "expired");
                Ok(())
            }),
        )?;
        targets.push((name, text));
    }

    for _ in 0..5 {
        tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
        for (name, text) in &targets {
            println!("{:>8}: {}", name, text.content());
        }
        println!();
    }

    countdowns.shutdown()?;
    Ok(())
}
