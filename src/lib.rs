//! Typed client for the Tempo Timesheets worklog API exposed by Jira servers.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;
pub mod worklogs;

pub use auth::Credentials;
pub use config::TempoConfig;
pub use error::{ApiError, Result, TransportError};
pub use models::{
    DecodeError, IssueType, User, Worklog, WorklogDate, WorklogIssue, WorklogTime,
};
pub use transport::{execute_json, ApiRequest, HttpTransport, RawResponse, ResponseMeta, Transport};
pub use worklogs::{WorklogQuery, WorklogService, WORKLOGS_PATH};
