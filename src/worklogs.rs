//! Read access to Tempo Timesheets worklogs.

use std::sync::Arc;

use reqwest::Method;
use url::form_urlencoded;

use crate::config::TempoConfig;
use crate::error::Result;
use crate::models::{Worklog, WorklogDate};
use crate::transport::{execute_json, HttpTransport, ResponseMeta, Transport};

pub const WORKLOGS_PATH: &str = "/rest/tempo-timesheets/3/worklogs";

/// Filters for the worklog listing. Unset filters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorklogQuery {
    pub project_key: Option<String>,
    pub username: Option<String>,
    pub date_from: Option<WorklogDate>,
    pub date_to: Option<WorklogDate>,
    pub extra: Vec<(String, String)>,
}

impl WorklogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_key(mut self, key: impl Into<String>) -> Self {
        self.project_key = Some(key.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn date_from(mut self, date: impl Into<WorklogDate>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    pub fn date_to(mut self, date: impl Into<WorklogDate>) -> Self {
        self.date_to = Some(date.into());
        self
    }

    /// Adds a raw query parameter the typed filters do not cover.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn pairs(&self) -> Vec<(&str, String)> {
        let mut pairs = Vec::new();
        if let Some(key) = &self.project_key {
            pairs.push(("projectKey", key.clone()));
        }
        if let Some(username) = &self.username {
            pairs.push(("username", username.clone()));
        }
        for (name, date) in [("dateFrom", self.date_from), ("dateTo", self.date_to)] {
            if let Some(date) = date.filter(|date| !date.is_zero()) {
                pairs.push((name, date.to_string()));
            }
        }
        for (key, value) in &self.extra {
            pairs.push((key.as_str(), value.clone()));
        }
        pairs
    }

    /// URL-encodes the filters. Callers must not rely on parameter order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Resource path with the encoded filters appended.
    pub fn endpoint(&self) -> String {
        let query = self.encode();
        if query.is_empty() {
            WORKLOGS_PATH.to_string()
        } else {
            format!("{WORKLOGS_PATH}?{query}")
        }
    }
}

/// Lists worklogs through a shared transport.
#[derive(Clone)]
pub struct WorklogService {
    transport: Arc<dyn Transport>,
}

impl WorklogService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Builds a service on top of a fresh [`HttpTransport`].
    pub fn from_config(config: TempoConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Fetches every worklog matching `query` in a single GET, in server order.
    ///
    /// Paginated results are not followed.
    pub async fn get_worklogs(&self, query: &WorklogQuery) -> Result<(Vec<Worklog>, ResponseMeta)> {
        let request = self
            .transport
            .new_request(Method::GET, &query.endpoint(), None)?;
        execute_json(self.transport.as_ref(), request).await
    }
}
