//! Jira user references embedded in worklog payloads.

use serde::Deserialize;
use std::collections::HashMap;

/// Represents a Jira user as referenced by worklogs, including login name/key, display name, email and avatar URLs.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub account_id: Option<String>,
    pub name: Option<String>,
    pub key: Option<String>,
    pub email_address: Option<String>,
    pub display_name: Option<String>,
    pub active: Option<bool>,
    pub time_zone: Option<String>,
    #[serde(default)]
    pub avatar_urls: Option<HashMap<String, String>>,
}

impl User {
    /// Returns the most human-friendly label available for the user.
    pub fn label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.key.as_deref())
    }
}
