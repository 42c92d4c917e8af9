// GitLab API endpoint functions.
// Typed methods for the handful of REST v4 calls the browser needs.

use crate::error::Result;

use super::client::GitLabClient;
use super::types::{Branch, Group, Job, Pipeline, Project};

impl GitLabClient {
    /// Get groups visible to the token.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let response = self.get("/groups").await?;
        let groups: Vec<Group> = response.json().await?;
        Ok(groups)
    }

    /// Get projects belonging to a group.
    pub async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>> {
        let response = self.get(&format!("/groups/{}/projects", group_id)).await?;
        let projects: Vec<Project> = response.json().await?;
        Ok(projects)
    }

    /// Get branches of a project's repository.
    pub async fn list_branches(&self, project_id: u64) -> Result<Vec<Branch>> {
        let response = self
            .get(&format!("/projects/{}/repository/branches", project_id))
            .await?;
        let branches: Vec<Branch> = response.json().await?;
        Ok(branches)
    }

    /// Get a project's pipelines for one ref.
    pub async fn list_pipelines(&self, project_id: u64, ref_name: &str) -> Result<Vec<Pipeline>> {
        let params = [("ref", ref_name)];
        let response = self
            .get_with_params(&format!("/projects/{}/pipelines", project_id), &params)
            .await?;
        let pipelines: Vec<Pipeline> = response.json().await?;
        Ok(pipelines)
    }

    /// Get jobs for a pipeline.
    pub async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<Job>> {
        let response = self
            .get(&format!(
                "/projects/{}/pipelines/{}/jobs",
                project_id, pipeline_id
            ))
            .await?;
        let jobs: Vec<Job> = response.json().await?;
        Ok(jobs)
    }

    /// Get the log for a job as raw text. Invalid UTF-8 is replaced with
    /// U+FFFD rather than failing the fetch.
    pub async fn get_job_trace(&self, project_id: u64, job_id: u64) -> Result<String> {
        let response = self
            .get(&format!("/projects/{}/jobs/{}/trace", project_id, job_id))
            .await?;
        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Retry a job. Only the status matters; the body describing the new
    /// job is not read.
    pub async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.post(&format!("/projects/{}/jobs/{}/retry", project_id, job_id))
            .await?;
        Ok(())
    }
}
