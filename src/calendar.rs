use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Number of days covered by every habit window.
pub const WINDOW_DAYS: usize = 30;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("date {0} is too early to build a 30-day window")]
    OutOfRange(NaiveDate),
}

/// Zero-padded `YYYY-MM-DD` key of a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DATE_KEY_FORMAT).to_string())
    }

    pub fn parse(value: &str) -> Result<Self, CalendarError> {
        let date = parse_date(value)?;
        Ok(Self::from_date(date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_date(&self) -> NaiveDate {
        // Only constructed from a valid date, so the round trip cannot fail.
        NaiveDate::parse_from_str(&self.0, DATE_KEY_FORMAT).unwrap_or_default()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CalendarError> {
    let shaped = value.len() == 10
        && value.bytes().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shaped {
        return Err(CalendarError::InvalidDate(value.to_string()));
    }

    NaiveDate::parse_from_str(value, DATE_KEY_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Day {
    pub date: NaiveDate,
    pub key: DateKey,
    pub is_today: bool,
    pub is_future: bool,
}

/// The thirty most recent days ending at a reference date, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    reference: NaiveDate,
    days: Vec<Day>,
}

impl CalendarWindow {
    /// Window ending today in the process local timezone.
    pub fn today() -> Result<Self, CalendarError> {
        Self::ending_at(Local::now().date_naive())
    }

    pub fn ending_at(reference: NaiveDate) -> Result<Self, CalendarError> {
        let span = Duration::days(WINDOW_DAYS as i64 - 1);
        let start = reference
            .checked_sub_signed(span)
            .ok_or(CalendarError::OutOfRange(reference))?;

        let days = (0..WINDOW_DAYS)
            .map(|offset| {
                let date = start + Duration::days(offset as i64);
                Day {
                    date,
                    key: DateKey::from_date(date),
                    is_today: date == reference,
                    is_future: date > reference,
                }
            })
            .collect();

        Ok(Self { reference, days })
    }

    pub fn from_reference_str(value: &str) -> Result<Self, CalendarError> {
        Self::ending_at(parse_date(value)?)
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        self.days.iter().any(|day| &day.key == key)
    }
}
