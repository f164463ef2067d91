mod issue;
mod time;
mod user;
mod worklog;

pub use issue::{IssueType, WorklogIssue};
pub use time::{
    DecodeError, WorklogDate, WorklogTime, NULL_SENTINEL, WORKLOG_DATE_FORMAT, WORKLOG_TIME_FORMAT,
};
pub use user::User;
pub use worklog::Worklog;
