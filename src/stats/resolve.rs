use super::Formats;
use crate::error::StatsError;
use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Resolves a bucket identifier (e.g. `2024-01-01`, `2024-W05`, `Jan 2024`, or `2024`) into the
/// date it names, trying each periodic mode's format in turn (daily, weekly, monthly, yearly). The
/// first format that parses wins.
///
/// Week-number identifiers name the Monday of their week, and identifiers without a day or month
/// resolve to the first day of the period.
pub fn resolve(formats: &Formats, identifier: &str) -> Result<NaiveDate, StatsError> {
    formats
        .iter()
        .find_map(|(_mode, format)| parse_with_format(identifier, format))
        .ok_or_else(|| StatsError::UnresolvedIdentifier(identifier.to_string()))
}

/// Parses the given identifier under a single strftime format, filling in whatever the format
/// leaves out. The whole identifier must be consumed.
fn parse_with_format(identifier: &str, format: &str) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, identifier, StrftimeItems::new(format)).ok()?;

    if parsed.weekday().is_none() {
        // Handled manually because chrono refuses a week 0 whose Monday is in the previous year
        if let (Some(year), Some(week)) = (parsed.year(), parsed.week_from_mon()) {
            return monday_of_week(year, week);
        }
        if parsed.isoweek().is_some() || parsed.week_from_sun().is_some() {
            parsed.set_weekday(Weekday::Mon).ok()?;
            return parsed.to_naive_date().ok();
        }
    }
    if parsed.ordinal().is_none() {
        if parsed.month().is_none() {
            parsed.set_month(1).ok()?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1).ok()?;
        }
    }

    parsed.to_naive_date().ok()
}

/// Gets the Monday of the given week of the year, where week 1 starts on the first Monday of the
/// year (the numbering `%W` uses). Week 0 is the partial week before that, and its Monday may
/// fall in the previous year.
fn monday_of_week(year: i32, week: u32) -> Option<NaiveDate> {
    if week > 53 {
        return None;
    }
    let new_year = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let to_first_monday = (7 - new_year.weekday().num_days_from_monday()) % 7;
    let first_monday = new_year.checked_add_signed(Duration::days(i64::from(to_first_monday)))?;

    first_monday.checked_add_signed(Duration::weeks(i64::from(week) - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Mode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolves_each_default_format() {
        let formats = Formats::default();
        assert_eq!(resolve(&formats, "2024-03-15").ok(), Some(date(2024, 3, 15)));
        assert_eq!(resolve(&formats, "2024-W05").ok(), Some(date(2024, 1, 29)));
        assert_eq!(resolve(&formats, "Feb 2024").ok(), Some(date(2024, 2, 1)));
        assert_eq!(resolve(&formats, "2024").ok(), Some(date(2024, 1, 1)));
    }

    #[test]
    fn unresolvable_identifiers_are_errors() {
        let formats = Formats::default();
        assert_eq!(resolve(&formats, "not-a-date").ok(), None);
        assert_eq!(resolve(&formats, "").ok(), None);
        assert_eq!(resolve(&formats, "2024-01-01 extra").ok(), None);
        assert_eq!(resolve(&formats, "2024-02-30").ok(), None);
        assert_eq!(
            resolve(&formats, "not-a-date"),
            Err(StatsError::UnresolvedIdentifier("not-a-date".to_string()))
        );
    }

    #[test]
    fn week_zero_can_start_in_previous_year() {
        // 2023-01-01 is a Sunday, so it sits in week 0 of 2023
        assert_eq!(monday_of_week(2023, 0), Some(date(2022, 12, 26)));
        assert_eq!(monday_of_week(2023, 1), Some(date(2023, 1, 2)));
        assert_eq!(monday_of_week(2024, 1), Some(date(2024, 1, 1)));
    }

    #[test]
    fn formatted_dates_resolve_back() {
        let formats = Formats::default();
        let day = date(2024, 7, 9);
        for mode in [Mode::Daily, Mode::Monthly, Mode::Yearly] {
            let start = match mode {
                Mode::Daily => day,
                Mode::Monthly => date(2024, 7, 1),
                _ => date(2024, 1, 1),
            };
            let label = start.format(formats.get(mode).unwrap()).to_string();
            assert_eq!(resolve(&formats, &label).ok(), Some(start), "mode {mode}");
        }
    }

    #[test]
    fn weekly_labels_resolve_to_their_monday() {
        let formats = Formats::default();
        let weekly = formats.get(Mode::Weekly).unwrap();
        let mut day = date(2022, 12, 20);
        while day <= date(2025, 1, 10) {
            let label = day.format(weekly).to_string();
            let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
            assert_eq!(resolve(&formats, &label).ok(), Some(monday), "label {label}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn iso_week_override_resolves_to_monday() {
        let mut formats = Formats::default();
        formats.set(Mode::Weekly, "%G-W%V").unwrap();
        assert_eq!(resolve(&formats, "2021-W01").ok(), Some(date(2021, 1, 4)));
    }
}
