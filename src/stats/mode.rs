use crate::error::StatsError;
use chrono::format::{Item, StrftimeItems};
use std::{fmt, str::FromStr};

/// A granularity at which statistics can be aggregated, or at which templates recur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// All-time aggregation. Never a valid recurrence cadence.
    Total,
}
impl Mode {
    /// The periodic modes, in the order identifiers are tried against their formats.
    pub const PERIODIC: [Mode; 4] = [Mode::Daily, Mode::Weekly, Mode::Monthly, Mode::Yearly];

    /// Whether or not this mode divides time into repeating buckets (everything but `total`).
    pub fn is_periodic(self) -> bool {
        self != Mode::Total
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Daily => "daily",
            Mode::Weekly => "weekly",
            Mode::Monthly => "monthly",
            Mode::Yearly => "yearly",
            Mode::Total => "total",
        }
    }
}
impl FromStr for Mode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "daily" => Ok(Mode::Daily),
            "weekly" => Ok(Mode::Weekly),
            "monthly" => Ok(Mode::Monthly),
            "yearly" => Ok(Mode::Yearly),
            "total" => Ok(Mode::Total),
            other => Err(StatsError::UnknownMode(other.to_string())),
        }
    }
}
impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a comma-separated list, trimming each entry and dropping empty ones.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a comma-separated list of modes (e.g. `daily, weekly, total`). Repeated modes are only
/// kept once, in the position they first appear.
pub fn parse_modes(list: &str) -> Result<Vec<Mode>, StatsError> {
    let mut modes = Vec::new();
    for entry in split_list(list) {
        let mode = entry.parse::<Mode>()?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    Ok(modes)
}

/// The table of date formats used both to label buckets and to parse identifiers back into
/// dates. Only the periodic modes have a format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formats {
    daily: String,
    weekly: String,
    monthly: String,
    yearly: String,
}
impl Default for Formats {
    fn default() -> Self {
        Self {
            daily: "%Y-%m-%d".to_string(),
            weekly: "%Y-W%W".to_string(),
            monthly: "%b %Y".to_string(),
            yearly: "%Y".to_string(),
        }
    }
}
impl Formats {
    /// Gets the format for the given mode, which will be `None` for [`Mode::Total`].
    pub fn get(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::Daily => Some(&self.daily),
            Mode::Weekly => Some(&self.weekly),
            Mode::Monthly => Some(&self.monthly),
            Mode::Yearly => Some(&self.yearly),
            Mode::Total => None,
        }
    }

    /// Overrides the format for the given mode, validating that it's a usable strftime string.
    pub fn set(&mut self, mode: Mode, format: &str) -> Result<(), StatsError> {
        let invalid = || StatsError::InvalidFormat {
            mode: mode.to_string(),
            format: format.to_string(),
        };
        if format.trim().is_empty() || StrftimeItems::new(format).any(|i| i == Item::Error) {
            return Err(invalid());
        }

        let slot = match mode {
            Mode::Daily => &mut self.daily,
            Mode::Weekly => &mut self.weekly,
            Mode::Monthly => &mut self.monthly,
            Mode::Yearly => &mut self.yearly,
            Mode::Total => return Err(StatsError::UnknownMode(mode.to_string())),
        };
        *slot = format.to_string();
        Ok(())
    }

    /// Iterates over the periodic modes and their formats in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (Mode, &str)> + '_ {
        Mode::PERIODIC
            .into_iter()
            .filter_map(move |mode| self.get(mode).map(|f| (mode, f)))
    }
}
