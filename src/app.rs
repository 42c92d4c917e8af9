// App state and main event loop.
// Maps key presses to navigation events and keeps view cursors in step with the controller.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;

use crate::gitlab::GitLabApi;
use crate::state::{Controller, JobAction, NavEvent, NodeRef, Screen, Transition};
use crate::ui;
use crate::view::{LogScroll, ViewState};

/// Main application state.
pub struct App<A> {
    /// Screen state machine and the API it fetches through.
    pub controller: Controller<A>,
    /// Cursors for the screens.
    pub view: ViewState,
    /// Fetch in progress, shown while the loop is blocked on it.
    pub busy: Option<&'static str>,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl<A: GitLabApi> App<A> {
    pub fn new(api: A) -> Self {
        Self {
            controller: Controller::new(api),
            view: ViewState::default(),
            busy: None,
            should_quit: false,
        }
    }

    /// Main event loop. Builds the tree first, then serves key presses.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.dispatch_drawn(terminal, NavEvent::Startup).await?;

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            if let Some(event) = self.poll_event()? {
                self.dispatch_drawn(terminal, event).await?;
            }
        }
        Ok(())
    }

    /// Read one key press, if any arrives within the poll window.
    #[allow(clippy::collapsible_if)]
    fn poll_event(&mut self) -> io::Result<Option<NavEvent>> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(None)
    }

    /// Show the busy label, then block on the transition.
    async fn dispatch_drawn(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        event: NavEvent,
    ) -> io::Result<()> {
        self.busy = busy_label(&event);
        if self.busy.is_some() {
            terminal.draw(|frame| ui::draw(frame, self))?;
        }
        self.dispatch(event).await;
        self.busy = None;
        Ok(())
    }

    /// Hand an event to the controller and reset cursors on a screen change.
    /// Failures are already in the controller's message log.
    pub async fn dispatch(&mut self, event: NavEvent) -> Transition {
        let from_action_picker = matches!(
            self.controller.screen(),
            Screen::JobActionPicker { .. }
        );

        match self.controller.handle(event).await {
            Ok(Transition::Moved) => {
                self.view
                    .enter(self.controller.screen(), from_action_picker);
                Transition::Moved
            }
            Ok(Transition::Stayed) => Transition::Stayed,
            Err(e) => {
                tracing::debug!(error = %e, "transition aborted");
                Transition::Stayed
            }
        }
    }

    /// Update cursors for a key press and return the navigation event it
    /// triggers, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<NavEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        if key.code == KeyCode::Char('q') && !self.controller.screen().is_modal() {
            self.should_quit = true;
            return None;
        }

        let view = &mut self.view;
        match self.controller.screen() {
            Screen::GroupProjectTree { groups } => match key.code {
                KeyCode::Down | KeyCode::Char('j') => view.tree.select_next(groups),
                KeyCode::Up | KeyCode::Char('k') => view.tree.select_prev(groups),
                KeyCode::Right | KeyCode::Char('l') => view.tree.expand(groups),
                KeyCode::Left | KeyCode::Char('h') => view.tree.collapse(groups),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let node_ref = view.tree.selected_row(groups)?.node.node_ref;
                    if let NodeRef::Group { .. } = node_ref {
                        view.tree.toggle(groups);
                    }
                    return Some(NavEvent::SelectNode(node_ref));
                }
                _ => {}
            },

            Screen::BranchPicker { branches, .. } => {
                // One button per branch plus Cancel
                let count = branches.len() + 1;
                match key.code {
                    KeyCode::Right | KeyCode::Down | KeyCode::Tab | KeyCode::Char('l') => {
                        view.branch_button.next(count)
                    }
                    KeyCode::Left | KeyCode::Up | KeyCode::BackTab | KeyCode::Char('h') => {
                        view.branch_button.prev(count)
                    }
                    KeyCode::Enter => {
                        return Some(NavEvent::BranchChosen {
                            button: Some(view.branch_button.focused),
                        });
                    }
                    KeyCode::Esc => return Some(NavEvent::BranchChosen { button: None }),
                    _ => {}
                }
            }

            Screen::PipelineList { pipelines, .. } => match key.code {
                KeyCode::Down | KeyCode::Char('j') => view.pipelines.select_next(pipelines.len()),
                KeyCode::Up | KeyCode::Char('k') => view.pipelines.select_prev(pipelines.len()),
                KeyCode::Enter => return view.pipelines.selected().map(NavEvent::SelectPipeline),
                _ => {}
            },

            Screen::JobList(list) => match key.code {
                KeyCode::Down | KeyCode::Char('j') => view.jobs.select_next(list.jobs.len()),
                KeyCode::Up | KeyCode::Char('k') => view.jobs.select_prev(list.jobs.len()),
                KeyCode::Enter => return view.jobs.selected().map(NavEvent::SelectJob),
                _ => {}
            },

            Screen::JobActionPicker { .. } => {
                let count = JobAction::ALL.len();
                match key.code {
                    KeyCode::Right | KeyCode::Down | KeyCode::Tab | KeyCode::Char('l') => {
                        view.action_button.next(count)
                    }
                    KeyCode::Left | KeyCode::Up | KeyCode::BackTab | KeyCode::Char('h') => {
                        view.action_button.prev(count)
                    }
                    KeyCode::Enter => {
                        return JobAction::ALL
                            .get(view.action_button.focused)
                            .copied()
                            .map(NavEvent::JobAction);
                    }
                    _ => {}
                }
            }

            // Scroll bounds come from the last draw of the pane.
            Screen::LogView { .. } => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Char('d') if ctrl => view.log_scroll.down(LogScroll::PAGE),
                    KeyCode::Char('u') if ctrl => view.log_scroll.up(LogScroll::PAGE),
                    KeyCode::Down | KeyCode::Char('j') => view.log_scroll.down(1),
                    KeyCode::Up | KeyCode::Char('k') => view.log_scroll.up(1),
                    KeyCode::PageDown => view.log_scroll.down(LogScroll::PAGE),
                    KeyCode::PageUp => view.log_scroll.up(LogScroll::PAGE),
                    KeyCode::Home | KeyCode::Char('g') => view.log_scroll.top(),
                    KeyCode::End | KeyCode::Char('G') => view.log_scroll.bottom(),
                    _ => {}
                }
            }
        }
        None
    }
}

/// Status text for events that block on a fetch.
fn busy_label(event: &NavEvent) -> Option<&'static str> {
    match event {
        NavEvent::Startup => Some("Loading groups and projects"),
        NavEvent::SelectNode(NodeRef::Project { .. }) => Some("Loading branches"),
        NavEvent::BranchChosen { button: Some(_) } => Some("Loading pipelines"),
        NavEvent::SelectPipeline(_) => Some("Loading jobs"),
        NavEvent::JobAction(JobAction::Logs) => Some("Loading log"),
        NavEvent::JobAction(JobAction::Retry) => Some("Retrying job"),
        _ => None,
    }
}
