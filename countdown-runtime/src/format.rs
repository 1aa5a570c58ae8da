//! Time field formatting with carry-up
//!
//! Field values depend on which fields appear earlier in the layout: minutes
//! absorb the hours when no `$h` precedes them, and seconds absorb everything
//! when neither `$h` nor `$m` precedes them. A layout of `"$m:$s"` therefore
//! shows 125 seconds as `2:05` and 3725 seconds as `62:05`.

use serde::Deserialize;

use crate::layout::{Layout, SegmentKind};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;

/// Where the two-digit-minutes option applies its leading zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinutesPadding {
    /// Prefix the seconds segment when the minutes value is below ten.
    /// Matches historical output, e.g. `"5:007"` for 307 seconds.
    #[default]
    Legacy,
    /// Prefix the minutes segment when its value is below ten
    #[serde(alias = "minutes")]
    MinutesField,
}

/// Formatting switches taken from instance options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub two_digit_minutes: bool,
    pub minutes_padding: MinutesPadding,
}

/// Populate every time field of `layout` for `remaining` seconds.
pub fn format(remaining: i64, layout: &mut Layout, options: FormatOptions) {
    let hours_place = remaining.div_euclid(SECONDS_PER_HOUR);
    let minutes_total = remaining.div_euclid(SECONDS_PER_MINUTE);
    let minutes_display = minutes_total - hours_place * 60;
    let seconds_display =
        remaining - hours_place * SECONDS_PER_HOUR - minutes_display * SECONDS_PER_MINUTE;

    let mut hours_seen = false;
    let mut minutes_seen = false;

    for segment in layout.segments_mut() {
        match segment.kind {
            SegmentKind::Hours => {
                segment.value = hours_place.to_string();
                hours_seen = true;
            }
            SegmentKind::Minutes => {
                let minutes = if hours_seen { minutes_display } else { minutes_total };
                segment.value = minutes.to_string();
                if options.two_digit_minutes
                    && options.minutes_padding == MinutesPadding::MinutesField
                    && minutes < 10
                {
                    segment.value.insert(0, '0');
                }
                minutes_seen = true;
            }
            SegmentKind::Seconds => {
                let seconds = if hours_seen || minutes_seen {
                    seconds_display
                } else {
                    remaining
                };
                segment.value = seconds.to_string();
                if options.two_digit_minutes
                    && options.minutes_padding == MinutesPadding::Legacy
                    && minutes_display < 10
                {
                    segment.value.insert(0, '0');
                }
                if seconds_display < 10 {
                    segment.value.insert(0, '0');
                }
            }
            SegmentKind::Text | SegmentKind::Other(_) => {}
        }
    }
}
