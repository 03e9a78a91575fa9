use crate::error::StatsError;
use chrono::NaiveDate;

/// A single measurement of checklist completion, either taken directly from one note or
/// aggregated over a bucket of them.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    /// The raw identifier from the note's title, or the bucket's label once aggregated.
    id: String,
    /// The date used to order and re-bucket this point.
    date: NaiveDate,
    checked: u64,
    unchecked: u64,
    /// Always `checked + unchecked`.
    total: u64,
    /// The fraction of items checked. This is only guaranteed to be current after
    /// [`Self::finalize`] when counts have been accumulated into this point.
    completion: f64,
}
impl DataPoint {
    /// Creates a new data point, deriving its total and completion ratio from the given counts.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        checked: i64,
        unchecked: i64,
    ) -> Result<Self, StatsError> {
        let (Ok(checked_count), Ok(unchecked_count)) =
            (u64::try_from(checked), u64::try_from(unchecked))
        else {
            return Err(StatsError::InvalidCount { checked, unchecked });
        };

        let mut point = Self {
            id: id.into(),
            date,
            checked: checked_count,
            unchecked: unchecked_count,
            total: checked_count + unchecked_count,
            completion: 0.0,
        };
        point.finalize();
        Ok(point)
    }

    /// Creates a point with no items, which has a completion of 0.
    pub fn empty(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            checked: 0,
            unchecked: 0,
            total: 0,
            completion: 0.0,
        }
    }

    /// Adds the counts of the given point into this one. The completion ratio is left stale until
    /// [`Self::finalize`] is called.
    pub fn accumulate(&mut self, other: &DataPoint) {
        self.checked += other.checked;
        self.unchecked += other.unchecked;
        self.total = self.checked + self.unchecked;
    }

    /// Recomputes the completion ratio from the current counts.
    pub fn finalize(&mut self) {
        self.completion = if self.total > 0 {
            self.checked as f64 / self.total as f64
        } else {
            0.0
        };
    }

    /// Produces a copy of this point under a different label, used when opening a new bucket.
    pub(crate) fn relabeled(&self, id: String) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn date(&self) -> NaiveDate {
        self.date
    }
    pub fn checked(&self) -> u64 {
        self.checked
    }
    pub fn unchecked(&self) -> u64 {
        self.unchecked
    }
    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn completion(&self) -> f64 {
        self.completion
    }
}
