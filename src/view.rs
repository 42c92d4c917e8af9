// Per-screen cursor state for the renderer.
// Tracks selection, expansion, and scroll; screen data lives in the controller.

use std::collections::HashSet;

use ratatui::widgets::ListState;

use crate::state::{NodeRef, Screen, TreeNode};

/// One visible row of the group/project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub node: &'a TreeNode,
    pub expanded: bool,
}

/// Selection and expansion state for the tree screen.
#[derive(Debug, Clone, Default)]
pub struct TreeCursor {
    /// Groups the user collapsed. Everything starts expanded.
    collapsed: HashSet<NodeRef>,
    pub list_state: ListState,
}

impl TreeCursor {
    /// Flatten the tree into the rows currently visible.
    pub fn visible_rows<'a>(&self, nodes: &'a [TreeNode]) -> Vec<TreeRow<'a>> {
        let mut rows = Vec::new();
        self.collect_rows(nodes, 0, &mut rows);
        rows
    }

    fn collect_rows<'a>(&self, nodes: &'a [TreeNode], depth: usize, rows: &mut Vec<TreeRow<'a>>) {
        for node in nodes {
            let expanded = !self.collapsed.contains(&node.node_ref);
            rows.push(TreeRow {
                depth,
                node,
                expanded,
            });
            if expanded {
                self.collect_rows(&node.children, depth + 1, rows);
            }
        }
    }

    /// Currently highlighted row.
    pub fn selected_row<'a>(&self, nodes: &'a [TreeNode]) -> Option<TreeRow<'a>> {
        let index = self.list_state.selected()?;
        self.visible_rows(nodes).into_iter().nth(index)
    }

    pub fn select_next(&mut self, nodes: &[TreeNode]) {
        let len = self.visible_rows(nodes).len();
        step_selection(&mut self.list_state, len, true);
    }

    pub fn select_prev(&mut self, nodes: &[TreeNode]) {
        let len = self.visible_rows(nodes).len();
        step_selection(&mut self.list_state, len, false);
    }

    /// Expand the highlighted group.
    pub fn expand(&mut self, nodes: &[TreeNode]) {
        if let Some(row) = self.selected_row(nodes) {
            self.collapsed.remove(&row.node.node_ref);
        }
    }

    /// Collapse the highlighted group, or jump to the parent of a project.
    pub fn collapse(&mut self, nodes: &[TreeNode]) {
        let Some(index) = self.list_state.selected() else {
            return;
        };
        let rows = self.visible_rows(nodes);
        let Some(row) = rows.get(index) else {
            return;
        };

        if matches!(row.node.node_ref, NodeRef::Group { .. }) {
            self.collapsed.insert(row.node.node_ref);
            return;
        }

        let parent = rows[..index]
            .iter()
            .rposition(|candidate| candidate.depth < row.depth);
        if let Some(parent) = parent {
            self.list_state.select(Some(parent));
        }
    }

    /// Toggle the highlighted group open or closed.
    pub fn toggle(&mut self, nodes: &[TreeNode]) {
        if let Some(row) = self.selected_row(nodes) {
            let node_ref = row.node.node_ref;
            if !self.collapsed.remove(&node_ref) {
                self.collapsed.insert(node_ref);
            }
        }
    }

    pub fn reset(&mut self, nodes: &[TreeNode]) {
        self.collapsed.clear();
        reset_selection(&mut self.list_state, nodes.len());
    }
}

/// Selection in a flat list of rows.
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    pub list_state: ListState,
}

impl ListCursor {
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn select_next(&mut self, len: usize) {
        step_selection(&mut self.list_state, len, true);
    }

    pub fn select_prev(&mut self, len: usize) {
        step_selection(&mut self.list_state, len, false);
    }

    pub fn reset(&mut self, len: usize) {
        reset_selection(&mut self.list_state, len);
    }
}

/// Focused button of a modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonCursor {
    pub focused: usize,
}

impl ButtonCursor {
    pub fn next(&mut self, count: usize) {
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn prev(&mut self, count: usize) {
        if count > 0 {
            self.focused = (self.focused + count - 1) % count;
        }
    }

    pub fn reset(&mut self) {
        self.focused = 0;
    }
}

/// Vertical scroll of the log pane, in rendered (wrapped) rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogScroll {
    pub offset: u16,
    /// Last offset that still fills the pane. Set by the renderer, which
    /// knows the pane size and how the text wraps.
    max_offset: u16,
}

impl LogScroll {
    pub const PAGE: u16 = 20;

    /// Record the wrapped row count and visible height of the pane.
    pub fn set_bounds(&mut self, rows: usize, height: u16) {
        let max = rows.saturating_sub(usize::from(height));
        self.max_offset = u16::try_from(max).unwrap_or(u16::MAX);
        self.offset = self.offset.min(self.max_offset);
    }

    pub fn down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
    }

    pub fn up(&mut self, lines: u16) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn top(&mut self) {
        self.offset = 0;
    }

    pub fn bottom(&mut self) {
        self.offset = self.max_offset;
    }
}

/// All view-side state, one slot per screen kind.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub tree: TreeCursor,
    pub branch_button: ButtonCursor,
    pub pipelines: ListCursor,
    pub jobs: ListCursor,
    pub action_button: ButtonCursor,
    pub log_scroll: LogScroll,
}

impl ViewState {
    /// Reset the cursor of a newly entered screen. Returning from the
    /// action picker keeps the job list where it was.
    pub fn enter(&mut self, screen: &Screen, from_action_picker: bool) {
        match screen {
            Screen::GroupProjectTree { groups } => self.tree.reset(groups),
            Screen::BranchPicker { branches, .. } => {
                self.branch_button.focused =
                    branches.iter().position(|branch| branch.default).unwrap_or(0);
            }
            Screen::PipelineList { pipelines, .. } => self.pipelines.reset(pipelines.len()),
            Screen::JobList(list) => {
                if !from_action_picker {
                    self.jobs.reset(list.jobs.len());
                }
            }
            Screen::JobActionPicker { .. } => self.action_button.reset(),
            Screen::LogView { .. } => self.log_scroll = LogScroll::default(),
        }
    }
}

fn step_selection(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let next = match state.selected() {
        Some(i) if forward => (i + 1).min(len - 1),
        Some(i) => i.saturating_sub(1),
        None => 0,
    };
    state.select(Some(next));
}

fn reset_selection(state: &mut ListState, len: usize) {
    state.select(if len == 0 { None } else { Some(0) });
}
