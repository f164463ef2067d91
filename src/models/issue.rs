use serde::Deserialize;

/// Partial issue projection returned inside each Tempo worklog.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorklogIssue {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub id: Option<i64>,
    pub project_id: Option<i64>,
    pub key: Option<String>,
    pub remaining_estimate_seconds: Option<i64>,
    #[serde(default)]
    pub issue_type: Option<IssueType>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub name: Option<String>,
    pub subtask: Option<bool>,
    pub avatar_id: Option<i64>,
}
