// Navigation controller.
// Owns the current screen and applies NavEvents, fetching through GitLabApi.

use crate::error::{GlpipeError, Result};
use crate::gitlab::{GitLabApi, Job};

use super::messages::MessageLog;
use super::navigation::{JobAction, JobListScreen, NavEvent, NodeRef, Screen, TreeNode};

/// Whether an event changed the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved,
    Stayed,
}

/// What an event asks for, resolved against the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Stay,
    BuildTree,
    FetchBranches {
        project_id: u64,
        project_path: String,
    },
    FetchPipelines {
        project_id: u64,
        project_path: String,
        ref_name: String,
    },
    FetchJobs {
        project_id: u64,
        pipeline_id: u64,
    },
    PickAction {
        list: JobListScreen,
        job: Job,
    },
    FetchLog {
        project_id: u64,
        job_id: u64,
        job_name: String,
    },
    Retry {
        list: JobListScreen,
        job_id: u64,
    },
    BackToJobs(JobListScreen),
}

/// Screen state machine over an injected GitLab API.
pub struct Controller<A> {
    api: A,
    screen: Screen,
    messages: MessageLog,
}

impl<A: GitLabApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            screen: Screen::default(),
            messages: MessageLog::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Apply one event. On a failed fetch the error is recorded and
    /// returned, and the current screen is left untouched.
    pub async fn handle(&mut self, event: NavEvent) -> Result<Transition> {
        let step = self.plan(event);
        tracing::debug!(?step, "navigation step");

        match self.execute(step).await? {
            Some(next) => {
                tracing::info!(from = %self.screen.title(), to = %next.title(), "screen change");
                self.screen = next;
                Ok(Transition::Moved)
            }
            None => Ok(Transition::Stayed),
        }
    }

    /// Resolve an event against the current screen without any IO.
    fn plan(&self, event: NavEvent) -> Step {
        match (&self.screen, event) {
            (_, NavEvent::Startup) => Step::BuildTree,

            (Screen::GroupProjectTree { groups }, NavEvent::SelectNode(node_ref)) => {
                match (node_ref, find_node(groups, node_ref)) {
                    (NodeRef::Project { id }, Some(node)) => Step::FetchBranches {
                        project_id: id,
                        project_path: node.path.clone(),
                    },
                    _ => Step::Stay,
                }
            }

            (
                Screen::BranchPicker {
                    project_id,
                    project_path,
                    branches,
                },
                NavEvent::BranchChosen { button },
            ) => match button.and_then(|index| branches.get(index)) {
                Some(branch) => Step::FetchPipelines {
                    project_id: *project_id,
                    project_path: project_path.clone(),
                    ref_name: branch.name.clone(),
                },
                // Cancel or dismissal keeps the picker focused.
                None => Step::Stay,
            },

            (
                Screen::PipelineList {
                    project_id,
                    pipelines,
                    ..
                },
                NavEvent::SelectPipeline(index),
            ) => match pipelines.get(index) {
                Some(pipeline) => Step::FetchJobs {
                    project_id: *project_id,
                    pipeline_id: pipeline.id,
                },
                None => Step::Stay,
            },

            (Screen::JobList(list), NavEvent::SelectJob(index)) => match list.jobs.get(index) {
                Some(job) => Step::PickAction {
                    list: list.clone(),
                    job: job.clone(),
                },
                None => Step::Stay,
            },

            (Screen::JobActionPicker { list, job }, NavEvent::JobAction(action)) => match action {
                JobAction::Logs => Step::FetchLog {
                    project_id: list.project_id,
                    job_id: job.id,
                    job_name: job.name.clone(),
                },
                JobAction::Retry => Step::Retry {
                    list: list.clone(),
                    job_id: job.id,
                },
                JobAction::Cancel => Step::BackToJobs(list.clone()),
            },

            _ => Step::Stay,
        }
    }

    async fn execute(&mut self, step: Step) -> Result<Option<Screen>> {
        let next = match step {
            Step::Stay => return Ok(None),

            Step::BuildTree => Screen::GroupProjectTree {
                groups: self.build_tree().await,
            },

            Step::FetchBranches {
                project_id,
                project_path,
            } => {
                let branches = self.api.list_branches(project_id).await.map_err(|e| {
                    self.report(format!("Error fetching branches for project {}", project_id), e)
                })?;
                if branches.is_empty() {
                    self.messages
                        .warn(format!("Project {} has no branches", project_path));
                }
                Screen::BranchPicker {
                    project_id,
                    project_path,
                    branches,
                }
            }

            Step::FetchPipelines {
                project_id,
                project_path,
                ref_name,
            } => {
                let pipelines = self
                    .api
                    .list_pipelines(project_id, &ref_name)
                    .await
                    .map_err(|e| {
                        self.report(
                            format!(
                                "Error fetching pipelines for project {} and branch {}",
                                project_id, ref_name
                            ),
                            e,
                        )
                    })?;
                Screen::PipelineList {
                    project_id,
                    project_path,
                    ref_name,
                    pipelines,
                }
            }

            Step::FetchJobs {
                project_id,
                pipeline_id,
            } => {
                let jobs = self
                    .api
                    .list_pipeline_jobs(project_id, pipeline_id)
                    .await
                    .map_err(|e| {
                        self.report(
                            format!(
                                "Error fetching jobs for project {} and pipeline {}",
                                project_id, pipeline_id
                            ),
                            e,
                        )
                    })?;
                Screen::JobList(JobListScreen {
                    project_id,
                    pipeline_id,
                    jobs,
                })
            }

            Step::PickAction { list, job } => Screen::JobActionPicker { list, job },

            Step::FetchLog {
                project_id,
                job_id,
                job_name,
            } => {
                let log = self
                    .api
                    .job_log(project_id, job_id)
                    .await
                    .map_err(|e| self.report(format!("Error fetching logs for job {}", job_id), e))?;
                Screen::LogView {
                    project_id,
                    job_id,
                    job_name,
                    log,
                }
            }

            Step::Retry { list, job_id } => {
                self.api
                    .retry_job(list.project_id, job_id)
                    .await
                    .map_err(|e| self.report(format!("Error retrying job {}", job_id), e))?;
                self.messages.info(format!("Job {} retried", job_id));
                Screen::JobList(list)
            }

            Step::BackToJobs(list) => Screen::JobList(list),
        };

        Ok(Some(next))
    }

    /// Fetch every group and its projects. Failures leave gaps in the
    /// tree rather than aborting it.
    async fn build_tree(&mut self) -> Vec<TreeNode> {
        let groups = match self.api.list_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                self.messages.error(format!("Error fetching groups: {}", e));
                return Vec::new();
            }
        };

        let mut nodes = Vec::with_capacity(groups.len());
        for group in &groups {
            let projects = match self.api.list_group_projects(group.id).await {
                Ok(projects) => projects,
                Err(e) => {
                    self.messages.error(format!(
                        "Error fetching projects for group {}: {}",
                        group.name, e
                    ));
                    Vec::new()
                }
            };
            nodes.push(TreeNode::group(group, &projects));
        }
        nodes
    }

    fn report(&mut self, context: String, error: GlpipeError) -> GlpipeError {
        self.messages.error(format!("{}: {}", context, error));
        error
    }
}

fn find_node(nodes: &[TreeNode], node_ref: NodeRef) -> Option<&TreeNode> {
    nodes.iter().find_map(|node| {
        if node.node_ref == node_ref {
            Some(node)
        } else {
            find_node(&node.children, node_ref)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::CiStatus;
    use crate::state::fake::{API, Call, EMPTY, FakeApi, INFRA, WEB, branch, infra_api, job};
    use crate::state::messages::MessageLevel;

    async fn started(api: FakeApi) -> Controller<FakeApi> {
        let mut controller = Controller::new(api);
        controller.handle(NavEvent::Startup).await.unwrap();
        controller.api().clear_calls();
        controller
    }

    async fn at_job_list(api: FakeApi) -> Controller<FakeApi> {
        let mut controller = started(api).await;
        controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: API }))
            .await
            .unwrap();
        controller
            .handle(NavEvent::BranchChosen { button: Some(1) })
            .await
            .unwrap();
        controller
            .handle(NavEvent::SelectPipeline(0))
            .await
            .unwrap();
        controller.api().clear_calls();
        controller
    }

    #[tokio::test]
    async fn test_startup_builds_tree_including_empty_groups() {
        let mut controller = Controller::new(infra_api());
        let transition = controller.handle(NavEvent::Startup).await.unwrap();
        assert_eq!(transition, Transition::Moved);

        let Screen::GroupProjectTree { groups } = controller.screen() else {
            panic!("expected tree, got {:?}", controller.screen());
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Infra");
        assert_eq!(
            groups[0]
                .children
                .iter()
                .map(|n| n.node_ref)
                .collect::<Vec<_>>(),
            vec![NodeRef::Project { id: API }, NodeRef::Project { id: WEB }]
        );
        assert_eq!(groups[1].node_ref, NodeRef::Group { id: EMPTY });
        assert!(groups[1].children.is_empty());
        assert_eq!(
            controller.api().calls(),
            vec![Call::Groups, Call::Projects(INFRA), Call::Projects(EMPTY)]
        );
    }

    #[tokio::test]
    async fn test_startup_group_failure_yields_empty_tree() {
        let api = FakeApi {
            fail_groups: true,
            ..infra_api()
        };
        let mut controller = Controller::new(api);
        controller.handle(NavEvent::Startup).await.unwrap();

        assert_eq!(
            controller.screen(),
            &Screen::GroupProjectTree { groups: Vec::new() }
        );
        let latest = controller.messages().latest().unwrap();
        assert_eq!(latest.level, MessageLevel::Error);
        assert!(latest.text.starts_with("Error fetching groups"));
    }

    #[tokio::test]
    async fn test_startup_project_failure_keeps_group_without_children() {
        let api = FakeApi {
            fail_projects_for: Some(INFRA),
            ..infra_api()
        };
        let controller = started(api).await;

        let Screen::GroupProjectTree { groups } = controller.screen() else {
            panic!("expected tree");
        };
        assert_eq!(groups.len(), 2);
        assert!(groups[0].children.is_empty());
        assert!(
            controller
                .messages()
                .latest()
                .unwrap()
                .text
                .contains("Infra")
        );
    }

    #[tokio::test]
    async fn test_selecting_project_fetches_branches_once() {
        let mut controller = started(infra_api()).await;
        let transition = controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: API }))
            .await
            .unwrap();

        assert_eq!(transition, Transition::Moved);
        assert_eq!(controller.api().calls(), vec![Call::Branches(API)]);
        assert_eq!(
            controller.screen(),
            &Screen::BranchPicker {
                project_id: API,
                project_path: "infra/api".to_string(),
                branches: vec![branch("main"), branch("dev")],
            }
        );
        assert_eq!(controller.screen().title(), "infra/api / Select Branch");
    }

    #[tokio::test]
    async fn test_selecting_group_is_noop() {
        let mut controller = started(infra_api()).await;
        let before = controller.screen().clone();

        let transition = controller
            .handle(NavEvent::SelectNode(NodeRef::Group { id: INFRA }))
            .await
            .unwrap();

        assert_eq!(transition, Transition::Stayed);
        assert_eq!(controller.screen(), &before);
        assert!(controller.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_selecting_unknown_project_is_noop() {
        let mut controller = started(infra_api()).await;
        let transition = controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: 4242 }))
            .await
            .unwrap();

        assert_eq!(transition, Transition::Stayed);
        assert!(controller.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_project_without_branches_shows_only_cancel() {
        let mut controller = started(infra_api()).await;
        controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: WEB }))
            .await
            .unwrap();

        let Screen::BranchPicker { branches, .. } = controller.screen() else {
            panic!("expected branch picker");
        };
        assert_eq!(
            crate::state::navigation::branch_buttons(branches),
            vec!["Cancel"]
        );
        let latest = controller.messages().latest().unwrap();
        assert_eq!(latest.level, MessageLevel::Warn);
        assert_eq!(latest.text, "Project infra/web has no branches");
    }

    #[tokio::test]
    async fn test_dismissing_branch_picker_is_idempotent() {
        let mut controller = started(infra_api()).await;
        controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: API }))
            .await
            .unwrap();
        let picker = controller.screen().clone();
        controller.api().clear_calls();

        // Esc, the Cancel button (index 2), and a stale index all keep the picker.
        for button in [None, Some(2), Some(7)] {
            let transition = controller
                .handle(NavEvent::BranchChosen { button })
                .await
                .unwrap();
            assert_eq!(transition, Transition::Stayed);
            assert_eq!(controller.screen(), &picker);
        }
        assert!(controller.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_branch_fetch_failure_keeps_tree() {
        let mut api = infra_api();
        api.branches.clear();
        let mut controller = started(api).await;
        let before = controller.screen().clone();

        let result = controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: API }))
            .await;

        assert!(matches!(result, Err(GlpipeError::NotFound(_))));
        assert_eq!(controller.screen(), &before);
        assert!(
            controller
                .messages()
                .latest()
                .unwrap()
                .text
                .starts_with("Error fetching branches for project 11")
        );
    }

    #[tokio::test]
    async fn test_full_walk_to_log_view() {
        let mut controller = started(infra_api()).await;

        controller
            .handle(NavEvent::SelectNode(NodeRef::Project { id: API }))
            .await
            .unwrap();
        controller
            .handle(NavEvent::BranchChosen { button: Some(1) })
            .await
            .unwrap();

        let Screen::PipelineList {
            ref_name,
            pipelines,
            ..
        } = controller.screen()
        else {
            panic!("expected pipeline list");
        };
        assert_eq!(ref_name, "dev");
        assert_eq!(controller.screen().title(), "infra/api / dev / Pipelines");
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].id, 10);
        assert_eq!(pipelines[0].status.to_string(), "success");

        controller
            .handle(NavEvent::SelectPipeline(0))
            .await
            .unwrap();
        let Screen::JobList(list) = controller.screen() else {
            panic!("expected job list");
        };
        assert_eq!(list.jobs, vec![job(99, "build", CiStatus::Failed)]);

        controller.handle(NavEvent::SelectJob(0)).await.unwrap();
        assert!(matches!(
            controller.screen(),
            Screen::JobActionPicker { job, .. } if job.id == 99
        ));

        controller
            .handle(NavEvent::JobAction(JobAction::Logs))
            .await
            .unwrap();
        let Screen::LogView { job_id, log, .. } = controller.screen() else {
            panic!("expected log view");
        };
        assert_eq!(*job_id, 99);
        assert_eq!(log, "\u{1b}[0KRunning with gitlab-runner\r\nexit 1\n");

        assert_eq!(
            controller.api().calls(),
            vec![
                Call::Branches(API),
                Call::Pipelines(API, "dev".to_string()),
                Call::Jobs(API, 10),
                Call::Log(API, 99),
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_returns_to_stale_job_list() {
        let mut controller = at_job_list(infra_api()).await;
        let job_list = controller.screen().clone();

        controller.handle(NavEvent::SelectJob(0)).await.unwrap();
        let transition = controller
            .handle(NavEvent::JobAction(JobAction::Retry))
            .await
            .unwrap();

        assert_eq!(transition, Transition::Moved);
        assert_eq!(controller.screen(), &job_list);
        assert_eq!(controller.api().calls(), vec![Call::Retry(API, 99)]);
        let latest = controller.messages().latest().unwrap();
        assert_eq!(latest.level, MessageLevel::Info);
        assert_eq!(latest.text, "Job 99 retried");
    }

    #[tokio::test]
    async fn test_retry_failure_stays_in_action_picker() {
        let api = FakeApi {
            fail_retry: true,
            ..infra_api()
        };
        let mut controller = at_job_list(api).await;
        controller.handle(NavEvent::SelectJob(0)).await.unwrap();
        let picker = controller.screen().clone();

        let result = controller
            .handle(NavEvent::JobAction(JobAction::Retry))
            .await;

        assert!(result.is_err());
        assert_eq!(controller.screen(), &picker);
        assert_eq!(controller.api().calls(), vec![Call::Retry(API, 99)]);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_job_list_without_fetch() {
        let mut controller = at_job_list(infra_api()).await;
        let job_list = controller.screen().clone();

        controller.handle(NavEvent::SelectJob(0)).await.unwrap();
        controller
            .handle(NavEvent::JobAction(JobAction::Cancel))
            .await
            .unwrap();

        assert_eq!(controller.screen(), &job_list);
        assert!(controller.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_log_failure_never_reaches_log_view() {
        let api = FakeApi {
            fail_logs: true,
            ..infra_api()
        };
        let mut controller = at_job_list(api).await;
        controller.handle(NavEvent::SelectJob(0)).await.unwrap();
        let picker = controller.screen().clone();

        let result = controller
            .handle(NavEvent::JobAction(JobAction::Logs))
            .await;

        assert!(result.is_err());
        assert_eq!(controller.screen(), &picker);
        assert!(!matches!(controller.screen(), Screen::LogView { .. }));
        assert!(
            controller
                .messages()
                .latest()
                .unwrap()
                .text
                .starts_with("Error fetching logs for job 99")
        );
    }

    #[tokio::test]
    async fn test_events_for_other_screens_are_ignored() {
        let mut controller = at_job_list(infra_api()).await;
        let before = controller.screen().clone();

        for event in [
            NavEvent::SelectPipeline(0),
            NavEvent::BranchChosen { button: Some(0) },
            NavEvent::JobAction(JobAction::Logs),
            NavEvent::SelectNode(NodeRef::Project { id: API }),
            NavEvent::SelectJob(5),
        ] {
            let transition = controller.handle(event).await.unwrap();
            assert_eq!(transition, Transition::Stayed);
        }
        assert_eq!(controller.screen(), &before);
        assert!(controller.api().calls().is_empty());
    }
}
