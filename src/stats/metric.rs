use super::{parse_modes, resolve, DataPoint, Formats, Mode};
use crate::error::StatsError;
use crate::store::NoteSource;
use anyhow::Result;
use chrono::Local;
use log::debug;
use std::sync::Arc;

/// The label given to the single all-time bucket.
pub const TOTAL_LABEL: &str = "total";

/// A tracked statistic: every checklist note found by searching for the keyword contributes one
/// raw data point, which can then be re-bucketed at any of the requested modes.
#[derive(Debug, Clone)]
pub struct Metric {
    name: String,
    /// The search term used to find notes, which is also stripped from their titles to leave the
    /// bucket identifier.
    keyword: String,
    modes: Vec<Mode>,
    formats: Arc<Formats>,
    /// Raw points, one per recognised note. Every point here has a resolved date.
    data: Vec<DataPoint>,
}
impl Metric {
    /// Creates a new metric with no data. The modes are given as a comma-separated list, and
    /// unknown ones are rejected immediately.
    pub fn new(
        name: impl Into<String>,
        keyword: impl Into<String>,
        modes: &str,
        formats: Arc<Formats>,
    ) -> Result<Self, StatsError> {
        Ok(Self {
            name: name.into(),
            keyword: keyword.into(),
            modes: parse_modes(modes)?,
            formats,
            data: Vec::new(),
        })
    }

    /// Adds a raw data point if the identifier resolves to a date under one of the known formats.
    /// Returns `Ok(false)` (and stores nothing) if it doesn't. Duplicate identifiers are kept as
    /// separate points.
    pub fn add_data_point(
        &mut self,
        identifier: &str,
        checked: i64,
        unchecked: i64,
    ) -> Result<bool, StatsError> {
        let Ok(date) = resolve(&self.formats, identifier) else {
            return Ok(false);
        };

        self.data
            .push(DataPoint::new(identifier, date, checked, unchecked)?);
        Ok(true)
    }

    /// Stably sorts the raw points by date. This must be done before requesting any periodic
    /// series.
    pub fn sort(&mut self) {
        self.data.sort_by_key(DataPoint::date);
    }

    /// Sums every raw point into a single all-time point. Its date is just the present day, and
    /// carries no meaning.
    pub fn total(&self) -> DataPoint {
        let mut total = DataPoint::empty(TOTAL_LABEL, Local::now().date_naive());
        for point in &self.data {
            total.accumulate(point);
        }
        total.finalize();
        total
    }

    /// Produces the series of points for the given mode. For `total`, this is always a single
    /// point; for periodic modes, it's one point per bucket in the order they were first seen.
    /// Data must have been sorted first.
    pub fn series(&self, mode: Mode) -> Vec<DataPoint> {
        match self.formats.get(mode) {
            Some(format) => aggregate(&self.data, format),
            None => vec![self.total()],
        }
    }

    /// Derives the bucket identifier from a note title by stripping the keyword from either end.
    pub fn identifier_for<'t>(&self, title: &'t str) -> &'t str {
        let title = title.strip_prefix(self.keyword.as_str()).unwrap_or(title);
        let title = title.strip_suffix(self.keyword.as_str()).unwrap_or(title);
        title.trim()
    }

    /// Searches the given source for notes matching this metric's keyword, and adds a raw point
    /// for each checklist among them whose title resolves to a date. Returns how many were added.
    pub fn load(&mut self, source: &impl NoteSource) -> Result<usize> {
        let notes = source.find(&self.keyword)?;
        let mut added = 0;
        for note in &notes {
            if !note.is_checklist() {
                debug!("skipping note {} ('{}'), not a checklist", note.id, note.title);
                continue;
            }

            let identifier = self.identifier_for(&note.title).to_string();
            if self.add_data_point(
                &identifier,
                note.checked_count() as i64,
                note.unchecked_count() as i64,
            )? {
                added += 1;
            } else {
                debug!(
                    "skipping note {} for metric '{}', '{identifier}' is not a date",
                    note.id, self.name
                );
            }
        }

        Ok(added)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }
    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }
}

/// Buckets the given points (which must be in date order) by formatting each point's date with
/// `format`. Consecutive points with the same label are summed into one bucket, which takes the
/// date of its first point.
pub fn aggregate(points: &[DataPoint], format: &str) -> Vec<DataPoint> {
    let mut series = Vec::new();
    let mut open: Option<DataPoint> = None;

    for point in points {
        let label = point.date().format(format).to_string();
        match open.as_mut() {
            Some(bucket) if bucket.id() == label => bucket.accumulate(point),
            _ => {
                if let Some(mut closed) = open.replace(point.relabeled(label)) {
                    closed.finalize();
                    series.push(closed);
                }
            }
        }
    }
    if let Some(mut last) = open {
        last.finalize();
        series.push(last);
    }

    series
}
