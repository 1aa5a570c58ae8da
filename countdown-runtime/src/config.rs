use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::dispatch::CallbackPolicy;
use crate::error::CountdownError;
use crate::format::MinutesPadding;
use crate::options::CountdownUpdate;
use crate::time_unit::TimeUnit;

/// Prefix for environment overrides, e.g. `COUNTDOWN_COUNTDOWNS__SALE__DURATION=60`
pub const ENV_PREFIX: &str = "COUNTDOWN";

/// Load config from a specific TOML file
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, CountdownError> {
    load_config(path.as_ref(), FileFormat::Toml)
}

/// Load config from a specific YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, CountdownError> {
    load_config(path.as_ref(), FileFormat::Yaml)
}

fn load_config(path: &Path, format: FileFormat) -> Result<Config, CountdownError> {
    let config = Config::builder()
        .add_source(File::from(path).format(format))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    Ok(config)
}

/// Resolve config placeholder like ${app.duration} or ${app.duration:900}
pub fn resolve_config_value(value: &str, config: &Config) -> Result<String, CountdownError> {
    if value.starts_with("${") && value.ends_with('}') {
        let inner = &value[2..value.len() - 1];

        if let Some((key, default_value)) = inner.split_once(':') {
            match config.get_string(key) {
                Ok(resolved) => Ok(resolved),
                Err(_) => Ok(default_value.to_string()),
            }
        } else {
            Ok(config.get_string(inner)?)
        }
    } else {
        Ok(value.to_string())
    }
}

/// `[scheduler]` settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default)]
    pub callback_errors: CallbackPolicy,
}

/// Read the `[scheduler]` table, falling back to defaults when absent
pub fn scheduler_settings(config: &Config) -> Result<SchedulerSettings, CountdownError> {
    match config.get::<SchedulerSettings>("scheduler") {
        Ok(settings) => Ok(settings),
        Err(config::ConfigError::NotFound(_)) => Ok(SchedulerSettings::default()),
        Err(err) => Err(err.into()),
    }
}

/// Names of all `[countdowns.<name>]` tables, sorted
pub fn countdown_names(config: &Config) -> Vec<String> {
    let mut names: Vec<String> = config
        .get_table("countdowns")
        .map(|table| table.into_keys().collect())
        .unwrap_or_default();
    names.sort();
    names
}

fn optional_string(config: &Config, key: &str) -> Result<Option<String>, CountdownError> {
    match config.get_string(key) {
        Ok(raw) => resolve_config_value(&raw, config).map(Some),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> CountdownError {
    CountdownError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Build an update from `[countdowns.<name>]`.
///
/// ```toml
/// [countdowns.sale]
/// duration = "15m"            # or 900, or "${app.sale_duration:900}"
/// layout = "Sale ends in $m:$s"
/// display_2_digit_minutes = false
/// minutes_padding = "legacy"  # or "minutes"
/// ```
pub fn countdown_update(config: &Config, name: &str) -> Result<CountdownUpdate, CountdownError> {
    let prefix = format!("countdowns.{name}");
    let mut update = CountdownUpdate::new();

    let duration_key = format!("{prefix}.duration");
    let Some(duration) = optional_string(config, &duration_key)? else {
        return Err(invalid(&duration_key, "missing duration"));
    };
    let seconds = TimeUnit::parse_seconds(&duration)
        .ok_or_else(|| invalid(&duration_key, format!("invalid duration '{duration}'")))?;
    if seconds < 0 {
        return Err(invalid(&duration_key, "duration must not be negative"));
    }
    update = update.duration(seconds);

    if let Some(layout) = optional_string(config, &format!("{prefix}.layout"))? {
        update = update.layout(layout);
    }

    let two_digit_key = format!("{prefix}.display_2_digit_minutes");
    if let Some(raw) = optional_string(config, &two_digit_key)? {
        let enabled = raw
            .trim()
            .parse::<bool>()
            .map_err(|_| invalid(&two_digit_key, format!("expected true or false, got '{raw}'")))?;
        update = update.display_two_digit_minutes(enabled);
    }

    let padding_key = format!("{prefix}.minutes_padding");
    if let Some(raw) = optional_string(config, &padding_key)? {
        let padding = match raw.trim().to_lowercase().as_str() {
            "legacy" => MinutesPadding::Legacy,
            "minutes" | "minutesfield" => MinutesPadding::MinutesField,
            other => return Err(invalid(&padding_key, format!("unknown padding '{other}'"))),
        };
        update = update.minutes_padding(padding);
    }

    Ok(update)
}
