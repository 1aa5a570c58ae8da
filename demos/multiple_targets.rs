use chrono::Local;
use countdown::{CountdownUpdate, CountdownsBuilder, MinutesPadding, RenderTarget, SharedTarget};
use std::sync::Arc;

/// A named line in the terminal
struct Line {
    name: &'static str,
}

impl RenderTarget for Line {
    fn render(&self, content: &str) {
        let now = Local::now().format("%H:%M:%S");
        println!("[{}] {:>8}: {}", now, self.name, content);
    }

    fn clear(&self) {
        println!("{:>19}: (cleared)", self.name);
    }

    fn label(&self) -> String {
        self.name.to_string()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("countdown_runtime=debug").init();

    println!("🚀 Three countdowns, one shared clock\n");

    let countdowns = CountdownsBuilder::new().build()?;
    let egg: SharedTarget = Arc::new(Line { name: "egg" });
    let tea: SharedTarget = Arc::new(Line { name: "tea" });
    let launch: SharedTarget = Arc::new(Line { name: "launch" });

    countdowns.configure(&egg, CountdownUpdate::new().duration(4).layout("$s s"))?;
    countdowns.configure(
        &tea,
        CountdownUpdate::new()
            .duration(185)
            .layout("$m:$s")
            .display_two_digit_minutes(true)
            .minutes_padding(MinutesPadding::MinutesField),
    )?;
    countdowns.configure(
        &launch,
        CountdownUpdate::new()
            .duration(3605)
            .layout("T-minus $h:$m:$s")
            .on_expiry(|target| {
                target.render("liftoff");
                Ok(())
            }),
    )?;

    tokio::time::sleep(tokio::time::Duration::from_millis(6500)).await;

    println!("\n📊 active countdowns: {}", countdowns.active_count());
    countdowns.destroy(&tea)?;
    countdowns.destroy(&launch)?;
    println!("✅ clock running: {}", countdowns.is_clock_running());

    Ok(())
}
