// GitLab API response types.
// Defines structs for deserializing GitLab REST v4 responses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitLab group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_path: String,
}

/// GitLab project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
}

/// Repository branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub default: bool,
}

/// Pipeline and job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiStatus {
    Created,
    WaitingForResource,
    Preparing,
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
    Skipped,
    Manual,
    Scheduled,
    #[serde(other)]
    Unknown,
}

impl CiStatus {
    /// Wire name as used by the GitLab API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CiStatus::Created => "created",
            CiStatus::WaitingForResource => "waiting_for_resource",
            CiStatus::Preparing => "preparing",
            CiStatus::Pending => "pending",
            CiStatus::Running => "running",
            CiStatus::Success => "success",
            CiStatus::Failed => "failed",
            CiStatus::Canceled => "canceled",
            CiStatus::Skipped => "skipped",
            CiStatus::Manual => "manual",
            CiStatus::Scheduled => "scheduled",
            CiStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline as returned by the project pipelines list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: CiStatus,
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default)]
    pub source: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Job within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    pub status: CiStatus,
    #[serde(default)]
    pub stage: Option<String>,
}
