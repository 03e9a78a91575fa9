use crate::error::StatsError;
use crate::stats::{Formats, Mode};
use crate::store::{Color, Label, ListItem, NewNote};
use chrono::{Days, Months, NaiveDate};
use std::sync::Arc;

/// The placeholder in a template's title that the formatted date replaces.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// A declarative recurring checklist, which can be expanded into a batch of todos over a range of
/// dates.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    /// The title pattern, containing [`DATE_PLACEHOLDER`] exactly once.
    title: String,
    /// The cadence, which is always periodic.
    mode: Mode,
    /// The format dates are written in when substituted into the title.
    format: String,
    items: Arc<[String]>,
    labels: Arc<[String]>,
    color: Option<Color>,
}
impl Template {
    /// Creates a new template, taking the date format for its cadence from the given table. This
    /// fails if the mode is `total`, or if the title doesn't have exactly one date placeholder.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        mode: Mode,
        formats: &Formats,
        items: Vec<String>,
        labels: Vec<String>,
        color: Option<Color>,
    ) -> Result<Self, StatsError> {
        let format = match formats.get(mode) {
            Some(format) if mode.is_periodic() => format,
            _ => return Err(StatsError::UnknownMode(mode.to_string())),
        };
        let title = title.into();
        if title.matches(DATE_PLACEHOLDER).count() != 1 {
            return Err(StatsError::MissingPlaceholder(title));
        }

        Ok(Self {
            name: name.into(),
            title,
            mode,
            format: format.to_string(),
            items: items.into(),
            labels: labels.into(),
            color,
        })
    }

    /// Produces the title for the repeat on the given date.
    pub fn date_to_title(&self, date: NaiveDate) -> String {
        self.title
            .replacen(DATE_PLACEHOLDER, &date.format(&self.format).to_string(), 1)
    }

    /// Gets the date `n` steps of this template's cadence after `from`. Each step is counted from
    /// `from` itself, so month-based cadences clamp to the end of short months without drifting
    /// (e.g. Jan 31, Feb 29, Mar 31).
    fn nth_date(&self, from: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self.mode {
            Mode::Daily => from.checked_add_days(Days::new(u64::from(n))),
            Mode::Weekly => from.checked_add_days(Days::new(u64::from(n) * 7)),
            Mode::Monthly => from.checked_add_months(Months::new(n)),
            Mode::Yearly => from.checked_add_months(Months::new(n.checked_mul(12)?)),
            // Rejected in construction
            Mode::Total => None,
        }
    }

    /// Iterates over the dates this template recurs on from `from` until `until` (both inclusive).
    /// If `until` is before `from`, this is empty.
    pub fn dates(&self, from: NaiveDate, until: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..)
            .map_while(move |n| self.nth_date(from, n))
            .take_while(move |date| *date <= until)
    }

    /// Generates a todo for every date this template recurs on in the given inclusive range.
    pub fn generate(&self, from: NaiveDate, until: NaiveDate) -> Vec<Todo> {
        self.dates(from, until)
            .map(|date| Todo {
                title: self.date_to_title(date),
                date,
                items: Arc::clone(&self.items),
                labels: Arc::clone(&self.labels),
                color: self.color,
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// A single generated checklist, ready to be created in the note store. The item and label lists
/// are shared with every other todo from the same template.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub title: String,
    pub date: NaiveDate,
    pub items: Arc<[String]>,
    /// Label names, resolved to the store's labels on creation.
    pub labels: Arc<[String]>,
    pub color: Option<Color>,
}
impl Todo {
    /// Builds the request to create this todo as a note. Label names are matched against the
    /// store's labels case-insensitively, and any that don't exist are left off.
    pub fn to_new_note(&self, store_labels: &[Label]) -> NewNote {
        NewNote {
            title: self.title.clone(),
            items: self
                .items
                .iter()
                .map(|text| ListItem {
                    text: text.clone(),
                    checked: false,
                })
                .collect(),
            labels: self
                .labels
                .iter()
                .filter_map(|name| {
                    store_labels
                        .iter()
                        .find(|label| label.name.to_lowercase() == name.to_lowercase())
                        .map(|label| label.id)
                })
                .collect(),
            color: self.color,
        }
    }
}
