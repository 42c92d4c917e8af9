// UI module for rendering the TUI.
// Dispatches on the current screen and draws the header and status bar.

pub mod list;
pub mod log;
mod modal;
mod tree;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::gitlab::GitLabApi;
use crate::state::{JobAction, MessageLevel, MessageLog, Screen, branch_buttons};
use crate::view::ViewState;

/// Main draw function that renders the entire UI.
pub fn draw<A: GitLabApi>(frame: &mut Frame, app: &mut App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let screen = app.controller.screen();

    draw_header(frame, screen, chunks[0]);
    draw_screen(frame, screen, &mut app.view, chunks[1]);
    draw_status_bar(frame, screen, app.controller.messages(), app.busy, chunks[2]);
}

/// Header with the current screen title.
fn draw_header(frame: &mut Frame, screen: &Screen, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " glpipe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(screen.title(), Style::default().fg(Color::White)),
    ]))
    .block(block);
    frame.render_widget(title, area);
}

/// Draw the content for the current screen. Modals go on top of the whole frame.
fn draw_screen(frame: &mut Frame, screen: &Screen, view: &mut ViewState, area: Rect) {
    match screen {
        Screen::GroupProjectTree { groups } => {
            tree::draw_tree(frame, groups, &mut view.tree, area);
        }
        Screen::BranchPicker { branches, .. } => {
            modal::draw_button_modal(
                frame,
                "Select Branch",
                &branch_buttons(branches),
                view.branch_button.focused,
            );
        }
        Screen::PipelineList {
            ref_name,
            pipelines,
            ..
        } => {
            list::render_pipelines_list(frame, ref_name, pipelines, &mut view.pipelines, area);
        }
        Screen::JobList(jobs) => {
            list::render_jobs_list(frame, jobs.pipeline_id, &jobs.jobs, &mut view.jobs, area);
        }
        Screen::JobActionPicker { list: jobs, job } => {
            list::render_jobs_list(frame, jobs.pipeline_id, &jobs.jobs, &mut view.jobs, area);
            let labels: Vec<&str> = JobAction::ALL.iter().map(JobAction::label).collect();
            modal::draw_button_modal(
                frame,
                &format!("Select Action for Job {}", job.id),
                &labels,
                view.action_button.focused,
            );
        }
        Screen::LogView {
            job_id,
            job_name,
            log,
            ..
        } => {
            log::draw_log_view(frame, *job_id, job_name, log, &mut view.log_scroll, area);
        }
    }
}

/// Draw the status bar with the latest message or keybinding hints.
fn draw_status_bar(
    frame: &mut Frame,
    screen: &Screen,
    messages: &MessageLog,
    busy: Option<&str>,
    area: Rect,
) {
    if let Some(busy) = busy {
        let text = Paragraph::new(format!(" ⏳ {}...", busy))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(text, area);
        return;
    }

    let hints = match screen {
        Screen::GroupProjectTree { .. } => vec![
            Span::raw(" ↑↓ "),
            Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
            Span::raw("  ←→ "),
            Span::styled("Collapse/Expand", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↵ "),
            Span::styled("Select", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ],
        Screen::BranchPicker { .. } | Screen::JobActionPicker { .. } => vec![
            Span::raw(" ←→ "),
            Span::styled("Move", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↵ "),
            Span::styled("Choose", Style::default().fg(Color::DarkGray)),
            Span::raw("  ^C "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ],
        Screen::PipelineList { .. } | Screen::JobList(_) => vec![
            Span::raw(" ↑↓ "),
            Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↵ "),
            Span::styled("Select", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ],
        Screen::LogView { .. } => vec![
            Span::raw(" ↑↓ "),
            Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
            Span::raw("  PgUp/Dn "),
            Span::styled("Page", Style::default().fg(Color::DarkGray)),
            Span::raw("  Home/End "),
            Span::styled("Jump", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ],
    };

    // Latest message first so it survives truncation on narrow terminals.
    let mut spans = Vec::new();
    if let Some(message) = messages.latest() {
        let color = match message.level {
            MessageLevel::Info => Color::Green,
            MessageLevel::Warn => Color::Yellow,
            MessageLevel::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!(
                " {} {}",
                message.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S"),
                message.text
            ),
            Style::default().fg(color),
        ));
        spans.push(Span::styled("  │", Style::default().fg(Color::DarkGray)));
    }
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
