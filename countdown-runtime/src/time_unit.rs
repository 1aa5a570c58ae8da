/// Time unit for countdown durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    /// Parse TimeUnit from string representation.
    /// Only accepts full lowercase names: "seconds", "minutes", "hours", "days"
    /// For shorthand notations like "5s", "10m", use `parse_duration` instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seconds" => Ok(TimeUnit::Seconds),
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            "days" => Ok(TimeUnit::Days),
            _ => Err(format!("Invalid time unit: {}", s)),
        }
    }
}

impl TimeUnit {
    /// Convert `value` of this unit to seconds, `None` on overflow
    pub fn to_seconds(&self, value: i64) -> Option<i64> {
        match self {
            TimeUnit::Seconds => Some(value),
            TimeUnit::Minutes => value.checked_mul(60),
            TimeUnit::Hours => value.checked_mul(3_600),
            TimeUnit::Days => value.checked_mul(86_400),
        }
    }

    /// Parse a duration string like "90s", "15m", "2h", "1d"
    /// Returns (value, TimeUnit) if successful
    ///
    /// Strict rules:
    /// - Only lowercase suffixes are accepted: "s", "m", "h", "d"
    /// - Format must be: <number><suffix> (e.g., "5s", "15m")
    /// - No spaces allowed between number and suffix
    pub fn parse_duration(s: &str) -> Option<(i64, TimeUnit)> {
        let s = s.trim();

        let split_pos = s.find(|c: char| !c.is_ascii_digit())?;
        if split_pos == 0 {
            return None;
        }

        let (num_str, unit_str) = s.split_at(split_pos);
        let value = num_str.parse::<i64>().ok()?;

        let time_unit = match unit_str {
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            _ => return None,
        };

        Some((value, time_unit))
    }

    /// Parse a plain number of seconds or a shorthand duration into seconds
    pub fn parse_seconds(s: &str) -> Option<i64> {
        let s = s.trim();
        if let Ok(seconds) = s.parse::<i64>() {
            return Some(seconds);
        }
        let (value, unit) = Self::parse_duration(s)?;
        unit.to_seconds(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shorthand() {
        assert_eq!(TimeUnit::parse_duration("15m"), Some((15, TimeUnit::Minutes)));
        assert_eq!(TimeUnit::parse_duration(" 2h "), Some((2, TimeUnit::Hours)));
        assert_eq!(TimeUnit::parse_duration("90s"), Some((90, TimeUnit::Seconds)));
    }

    #[test]
    fn rejects_bad_shorthand() {
        assert_eq!(TimeUnit::parse_duration("15"), None);
        assert_eq!(TimeUnit::parse_duration("m"), None);
        assert_eq!(TimeUnit::parse_duration("15M"), None);
        assert_eq!(TimeUnit::parse_duration("15 m"), None);
        assert_eq!(TimeUnit::parse_duration("500ms"), None);
    }

    #[test]
    fn parse_seconds_accepts_plain_and_shorthand() {
        assert_eq!(TimeUnit::parse_seconds("900"), Some(900));
        assert_eq!(TimeUnit::parse_seconds("15m"), Some(900));
        assert_eq!(TimeUnit::parse_seconds("1d"), Some(86_400));
        assert_eq!(TimeUnit::parse_seconds("soon"), None);
    }

    #[test]
    fn full_names_parse() {
        assert_eq!("Hours".parse::<TimeUnit>(), Ok(TimeUnit::Hours));
        assert!("fortnights".parse::<TimeUnit>().is_err());
    }
}
