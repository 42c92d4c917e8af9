// Navigation screens and the events that move between them.
// Free of UI toolkit types so the controller can be driven by synthetic events.

use crate::gitlab::{Branch, Group, Job, Pipeline, Project};

/// Identity attached to a node of the group/project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Group { id: u64 },
    Project { id: u64 },
}

/// A node in the group/project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Full namespace path, e.g. `infra/api`.
    pub path: String,
    pub node_ref: NodeRef,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Group node with its project children (possibly none).
    pub fn group(group: &Group, projects: &[Project]) -> Self {
        Self {
            name: group.name.clone(),
            path: path_or_name(&group.full_path, &group.name),
            node_ref: NodeRef::Group { id: group.id },
            children: projects.iter().map(TreeNode::project).collect(),
        }
    }

    pub fn project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            path: path_or_name(&project.path_with_namespace, &project.name),
            node_ref: NodeRef::Project { id: project.id },
            children: Vec::new(),
        }
    }
}

fn path_or_name(path: &str, name: &str) -> String {
    let shown = if path.is_empty() { name } else { path };
    shown.to_string()
}

/// Jobs of one pipeline, kept while the job list or its action picker is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListScreen {
    pub project_id: u64,
    pub pipeline_id: u64,
    pub jobs: Vec<Job>,
}

/// The screen currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Groups with their projects.
    GroupProjectTree { groups: Vec<TreeNode> },
    /// Branch choice for one project. The last button is Cancel.
    BranchPicker {
        project_id: u64,
        project_path: String,
        branches: Vec<Branch>,
    },
    /// Pipelines of one project filtered by ref.
    PipelineList {
        project_id: u64,
        project_path: String,
        ref_name: String,
        pipelines: Vec<Pipeline>,
    },
    /// Jobs of one pipeline.
    JobList(JobListScreen),
    /// Logs / Retry / Cancel for one job, over the job list it came from.
    JobActionPicker { list: JobListScreen, job: Job },
    /// One job's log text.
    LogView {
        project_id: u64,
        job_id: u64,
        job_name: String,
        log: String,
    },
}

impl Screen {
    /// Get the display title for this screen.
    pub fn title(&self) -> String {
        match self {
            Screen::GroupProjectTree { .. } => "GitLab Pipelines".to_string(),
            Screen::BranchPicker { project_path, .. } => {
                format!("{} / Select Branch", project_path)
            }
            Screen::PipelineList {
                project_path,
                ref_name,
                ..
            } => format!("{} / {} / Pipelines", project_path, ref_name),
            Screen::JobList(list) | Screen::JobActionPicker { list, .. } => {
                format!("Pipeline #{} / Jobs", list.pipeline_id)
            }
            Screen::LogView { job_id, job_name, .. } => {
                format!("Job {} ({}) / Logs", job_id, job_name)
            }
        }
    }

    /// Whether this screen is drawn as a modal over other content.
    /// Modals swallow `q`; only Ctrl+C quits from them.
    pub fn is_modal(&self) -> bool {
        matches!(
            self,
            Screen::BranchPicker { .. } | Screen::JobActionPicker { .. }
        )
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::GroupProjectTree { groups: Vec::new() }
    }
}

/// Button labels of the branch picker: one per branch, then Cancel.
pub fn branch_buttons(branches: &[Branch]) -> Vec<&str> {
    branches
        .iter()
        .map(|branch| branch.name.as_str())
        .chain(std::iter::once(CANCEL_LABEL))
        .collect()
}

pub const CANCEL_LABEL: &str = "Cancel";

/// Choice offered by the job action picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Logs,
    Retry,
    Cancel,
}

impl JobAction {
    pub const ALL: [JobAction; 3] = [JobAction::Logs, JobAction::Retry, JobAction::Cancel];

    pub fn label(&self) -> &'static str {
        match self {
            JobAction::Logs => "Logs",
            JobAction::Retry => "Retry",
            JobAction::Cancel => CANCEL_LABEL,
        }
    }
}

/// Input to the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// Build the group/project tree.
    Startup,
    /// A tree node was selected.
    SelectNode(NodeRef),
    /// A branch picker button was pressed; `None` when dismissed.
    BranchChosen { button: Option<usize> },
    /// A pipeline row was selected.
    SelectPipeline(usize),
    /// A job row was selected.
    SelectJob(usize),
    /// A job action picker button was pressed.
    JobAction(JobAction),
}
