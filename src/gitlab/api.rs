// Operations the navigation controller needs from GitLab.
// Implemented by the HTTP client; tests substitute an in-memory fake.

use async_trait::async_trait;

use crate::error::Result;

use super::client::GitLabClient;
use super::types::{Branch, Group, Job, Pipeline, Project};

#[async_trait]
pub trait GitLabApi {
    async fn list_groups(&self) -> Result<Vec<Group>>;
    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>>;
    async fn list_branches(&self, project_id: u64) -> Result<Vec<Branch>>;
    async fn list_pipelines(&self, project_id: u64, ref_name: &str) -> Result<Vec<Pipeline>>;
    async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<Job>>;
    async fn job_log(&self, project_id: u64, job_id: u64) -> Result<String>;
    async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()>;
}

#[async_trait]
impl GitLabApi for GitLabClient {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        GitLabClient::list_groups(self).await
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>> {
        GitLabClient::list_group_projects(self, group_id).await
    }

    async fn list_branches(&self, project_id: u64) -> Result<Vec<Branch>> {
        GitLabClient::list_branches(self, project_id).await
    }

    async fn list_pipelines(&self, project_id: u64, ref_name: &str) -> Result<Vec<Pipeline>> {
        GitLabClient::list_pipelines(self, project_id, ref_name).await
    }

    async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<Job>> {
        GitLabClient::list_pipeline_jobs(self, project_id, pipeline_id).await
    }

    async fn job_log(&self, project_id: u64, job_id: u64) -> Result<String> {
        self.get_job_trace(project_id, job_id).await
    }

    async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        GitLabClient::retry_job(self, project_id, job_id).await
    }
}
