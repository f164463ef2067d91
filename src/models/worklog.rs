//! Worklog records returned by the Tempo Timesheets API.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::models::{User, WorklogIssue, WorklogTime};

/// One unit of time logged against an issue. Every field is optional and absent keys stay `None`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub id: Option<i64>,
    pub issue: Option<WorklogIssue>,
    pub author: Option<User>,
    pub time_spent: Option<String>,
    pub time_spent_seconds: Option<i64>,
    pub comment: Option<String>,
    #[serde(rename = "dateCreated")]
    pub created: Option<WorklogTime>,
    #[serde(rename = "dateUpdated")]
    pub updated: Option<WorklogTime>,
    pub update_author: Option<User>,
    #[serde(rename = "dateStarted")]
    pub started: Option<WorklogTime>,
}

impl Worklog {
    /// Returns when the logged work began, if the payload carried a real timestamp.
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.started.and_then(|started| started.get())
    }

    pub fn issue_key(&self) -> Option<&str> {
        self.issue.as_ref().and_then(|issue| issue.key.as_deref())
    }
}
