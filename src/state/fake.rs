// In-memory GitLab API for controller and app tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{GlpipeError, Result};
use crate::gitlab::{Branch, CiStatus, GitLabApi, Group, Job, Pipeline, Project};

/// Calls observed by the fake, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Groups,
    Projects(u64),
    Branches(u64),
    Pipelines(u64, String),
    Jobs(u64, u64),
    Log(u64, u64),
    Retry(u64, u64),
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pub(crate) groups: Vec<Group>,
    pub(crate) projects: HashMap<u64, Vec<Project>>,
    pub(crate) branches: HashMap<u64, Vec<Branch>>,
    pub(crate) pipelines: HashMap<(u64, String), Vec<Pipeline>>,
    pub(crate) jobs: HashMap<(u64, u64), Vec<Job>>,
    pub(crate) logs: HashMap<u64, String>,
    pub(crate) fail_groups: bool,
    pub(crate) fail_projects_for: Option<u64>,
    pub(crate) fail_logs: bool,
    pub(crate) fail_retry: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

fn not_found(what: &str) -> GlpipeError {
    GlpipeError::NotFound(what.to_string())
}

#[async_trait]
impl GitLabApi for FakeApi {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.record(Call::Groups);
        if self.fail_groups {
            return Err(GlpipeError::Unauthorized);
        }
        Ok(self.groups.clone())
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>> {
        self.record(Call::Projects(group_id));
        if self.fail_projects_for == Some(group_id) {
            return Err(not_found("projects"));
        }
        Ok(self.projects.get(&group_id).cloned().unwrap_or_default())
    }

    async fn list_branches(&self, project_id: u64) -> Result<Vec<Branch>> {
        self.record(Call::Branches(project_id));
        self.branches
            .get(&project_id)
            .cloned()
            .ok_or_else(|| not_found("branches"))
    }

    async fn list_pipelines(&self, project_id: u64, ref_name: &str) -> Result<Vec<Pipeline>> {
        self.record(Call::Pipelines(project_id, ref_name.to_string()));
        self.pipelines
            .get(&(project_id, ref_name.to_string()))
            .cloned()
            .ok_or_else(|| not_found("pipelines"))
    }

    async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<Job>> {
        self.record(Call::Jobs(project_id, pipeline_id));
        self.jobs
            .get(&(project_id, pipeline_id))
            .cloned()
            .ok_or_else(|| not_found("jobs"))
    }

    async fn job_log(&self, project_id: u64, job_id: u64) -> Result<String> {
        self.record(Call::Log(project_id, job_id));
        if self.fail_logs {
            return Err(GlpipeError::Other("HTTP 500".to_string()));
        }
        self.logs.get(&job_id).cloned().ok_or_else(|| not_found("trace"))
    }

    async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.record(Call::Retry(project_id, job_id));
        if self.fail_retry {
            return Err(GlpipeError::Other("HTTP 403".to_string()));
        }
        Ok(())
    }
}

pub(crate) const INFRA: u64 = 1;
pub(crate) const EMPTY: u64 = 2;
pub(crate) const API: u64 = 11;
pub(crate) const WEB: u64 = 12;

pub(crate) fn branch(name: &str) -> Branch {
    Branch {
        name: name.to_string(),
        default: name == "main",
    }
}

pub(crate) fn job(id: u64, name: &str, status: CiStatus) -> Job {
    Job {
        id,
        name: name.to_string(),
        status,
        stage: Some("test".to_string()),
    }
}

/// Group "Infra" with api/web, an empty group, and one pipeline on api@dev.
pub(crate) fn infra_api() -> FakeApi {
    let mut api = FakeApi {
        groups: vec![
            Group {
                id: INFRA,
                name: "Infra".to_string(),
                full_path: "infra".to_string(),
            },
            Group {
                id: EMPTY,
                name: "Empty".to_string(),
                full_path: "empty".to_string(),
            },
        ],
        ..FakeApi::default()
    };
    api.projects.insert(
        INFRA,
        vec![
            Project {
                id: API,
                name: "api".to_string(),
                path_with_namespace: "infra/api".to_string(),
            },
            Project {
                id: WEB,
                name: "web".to_string(),
                path_with_namespace: "infra/web".to_string(),
            },
        ],
    );
    api.branches.insert(API, vec![branch("main"), branch("dev")]);
    api.branches.insert(WEB, Vec::new());
    api.pipelines.insert(
        (API, "dev".to_string()),
        vec![Pipeline {
            id: 10,
            status: CiStatus::Success,
            ref_name: "dev".to_string(),
            source: Some("push".to_string()),
            updated_at: None,
        }],
    );
    api.jobs
        .insert((API, 10), vec![job(99, "build", CiStatus::Failed)]);
    api.logs
        .insert(99, "\u{1b}[0KRunning with gitlab-runner\r\nexit 1\n".to_string());
    api
}
