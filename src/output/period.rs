use chrono::NaiveDate;

use crate::core::MonthBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Day,
    Month,
}

impl Period {
    /// Column label in tables and CSV headers
    pub(crate) fn label(self) -> &'static str {
        match self {
            Period::Day => "date",
            Period::Month => "month",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Period::Day => "Daily Orders",
            Period::Month => "Monthly Orders",
        }
    }
}

/// Temporal bucket as rendered: a sortable key and a display label
pub(crate) trait PeriodKey {
    const PERIOD: Period;

    fn key(&self) -> String;

    fn label(&self) -> String {
        self.key()
    }
}

impl PeriodKey for MonthBucket {
    const PERIOD: Period = Period::Month;

    fn key(&self) -> String {
        MonthBucket::key(self)
    }

    fn label(&self) -> String {
        MonthBucket::label(self)
    }
}

impl PeriodKey for NaiveDate {
    const PERIOD: Period = Period::Day;

    fn key(&self) -> String {
        self.format(crate::consts::DATE_FORMAT).to_string()
    }
}
