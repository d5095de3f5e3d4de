use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// Zone in which offset-carrying timestamps are read as calendar dates
#[derive(Debug, Clone, Copy, Default)]
pub(crate) enum Timezone {
    /// Keep the date as written in the timestamp's own offset
    #[default]
    Original,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = value else {
            return Ok(Timezone::Original);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("original") {
            return Ok(Timezone::Original);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    pub(crate) fn date_of(self, dt: DateTime<FixedOffset>) -> NaiveDate {
        match self {
            Timezone::Original => dt.date_naive(),
            Timezone::Named(tz) => dt.with_timezone(&tz).date_naive(),
        }
    }
}
