//! Search filters accepted by the catalog.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// A metadata search: every populated field adds one conjunctive filter.
///
/// An empty query matches every document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against filename, content type, and path.
    pub text: Option<String>,
    /// Inclusive `upload_date` bounds.
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Exact content type.
    pub content_type: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from raw request parameters.
    ///
    /// Blank strings count as absent. The date range is only applied when
    /// both bounds are present; a lone bound is ignored.
    pub fn from_params(
        text: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        content_type: Option<&str>,
    ) -> TypesResult<Self> {
        let start = non_blank(start_date).map(parse_start).transpose()?;
        let end = non_blank(end_date).map(parse_end).transpose()?;

        Ok(Self {
            text: non_blank(text).map(str::to_string),
            date_range: start.zip(end),
            content_type: non_blank(content_type).map(str::to_string),
        })
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_range = Some((start, end));
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns `true` when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.date_range.is_none() && self.content_type.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A bare date starts at midnight UTC.
fn parse_start(value: &str) -> TypesResult<DateTime<Utc>> {
    parse_timestamp(value, NaiveTime::MIN)
}

/// A bare date ends at the last millisecond of that day.
fn parse_end(value: &str) -> TypesResult<DateTime<Utc>> {
    let end_of_day = NaiveTime::MIN - Duration::milliseconds(1);
    parse_timestamp(value, end_of_day)
}

fn parse_timestamp(value: &str, time_of_day: NaiveTime) -> TypesResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(time_of_day).and_utc())
        .map_err(|_| TypesError::InvalidDate {
            value: value.to_string(),
        })
}
