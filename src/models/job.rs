use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status given to new jobs when none is supplied.
pub const DEFAULT_STATUS: &str = "Pending";

/// Statuses offered by the job forms. Any other string is accepted too.
pub const SUGGESTED_STATUSES: &[&str] = &["Pending", "In Progress", "On Hold", "Cleared", "Delivered"];

/// A shipment-processing job.
///
/// `assignee_username` is filled by an explicit join on `users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: i64,
    pub reference: String,
    pub importer_name: String,
    pub received_at: DateTime<Utc>,
    pub status: String,
    pub assignee_id: Option<i64>,
    pub assignee_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conjunctive filters for the job list. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobFilter {
    pub status: Option<String>,
    #[serde(rename = "allocated")]
    pub assigned_username: Option<String>,
    #[serde(rename = "q")]
    pub search_text: Option<String>,
}

impl JobFilter {
    pub fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    pub fn assigned_username(&self) -> Option<&str> {
        non_empty(self.assigned_username.as_deref())
    }

    pub fn search_text(&self) -> Option<&str> {
        non_empty(self.search_text.as_deref())
    }
}

/// Input to `add_job`, already detached from any transport.
#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub reference: String,
    pub importer_name: String,
    pub received_time: Option<String>,
    pub assigned_username: Option<String>,
    pub status: Option<String>,
}

/// Partial update. `None` leaves a field untouched; for the assignee,
/// `Some("")` or an unknown username clears the assignment.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub importer_name: Option<String>,
    pub status: Option<String>,
    pub assigned_username: Option<String>,
}

/// Trim and drop empty strings.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a received timestamp from RFC 3339 or an HTML `datetime-local`
/// value (taken as UTC). Anything unparseable yields `None`.
pub fn parse_received_time(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.and_utc())
}
