// List rendering for pipelines and jobs.
// Provides styled list views with empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::gitlab::{CiStatus, Job, Pipeline};
use crate::view::ListCursor;

/// Format an update timestamp the way the pipeline list shows it.
pub fn format_timestamp(dt: Option<&DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Get color for a pipeline or job status.
pub fn status_color(status: CiStatus) -> Color {
    match status {
        CiStatus::Success => Color::Green,
        CiStatus::Failed => Color::Red,
        CiStatus::Running => Color::Yellow,
        CiStatus::Pending
        | CiStatus::Created
        | CiStatus::WaitingForResource
        | CiStatus::Preparing
        | CiStatus::Scheduled => Color::Blue,
        CiStatus::Manual => Color::Magenta,
        CiStatus::Canceled | CiStatus::Skipped | CiStatus::Unknown => Color::Gray,
    }
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

fn field<'a>(label: &'a str, value: String, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}

fn list_block(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

fn highlighted(list: List<'_>) -> List<'_> {
    list.highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ")
}

/// Render the pipelines of one ref.
pub fn render_pipelines_list(
    frame: &mut Frame,
    ref_name: &str,
    pipelines: &[Pipeline],
    cursor: &mut ListCursor,
    area: Rect,
) {
    let block = list_block(format!(" Pipelines on {} ", ref_name));

    if pipelines.is_empty() {
        frame.render_widget(block, area);
        render_empty(
            frame,
            area.inner(Margin::new(1, 1)),
            "No pipelines for this branch",
        );
        return;
    }

    let items: Vec<ListItem> = pipelines
        .iter()
        .map(|pipeline| {
            let plain = Style::default().fg(Color::White);
            ListItem::new(vec![
                field(
                    "Pipeline ID: ",
                    pipeline.id.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                field(
                    "Status: ",
                    pipeline.status.to_string(),
                    Style::default().fg(status_color(pipeline.status)),
                ),
                field("Ref: ", pipeline.ref_name.clone(), plain),
                field(
                    "Source: ",
                    pipeline.source.clone().unwrap_or_else(|| "-".to_string()),
                    plain,
                ),
                field(
                    "Updated At: ",
                    format_timestamp(pipeline.updated_at.as_ref()),
                    plain,
                ),
                Line::from(""),
            ])
        })
        .collect();

    let list_widget = highlighted(List::new(items).block(block));
    frame.render_stateful_widget(list_widget, area, &mut cursor.list_state);
}

/// Render the jobs of one pipeline.
pub fn render_jobs_list(
    frame: &mut Frame,
    pipeline_id: u64,
    jobs: &[Job],
    cursor: &mut ListCursor,
    area: Rect,
) {
    let block = list_block(format!(" Jobs of pipeline #{} ", pipeline_id));

    if jobs.is_empty() {
        frame.render_widget(block, area);
        render_empty(
            frame,
            area.inner(Margin::new(1, 1)),
            "No jobs in this pipeline",
        );
        return;
    }

    let items: Vec<ListItem> = jobs
        .iter()
        .map(|job| {
            let mut name = job.name.clone();
            if let Some(stage) = &job.stage {
                name.push_str(&format!("  ({})", stage));
            }
            ListItem::new(vec![
                field(
                    "Job ID: ",
                    job.id.to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                field("Name: ", name, Style::default().fg(Color::White)),
                field(
                    "Status: ",
                    job.status.to_string(),
                    Style::default().fg(status_color(job.status)),
                ),
                Line::from(""),
            ])
        })
        .collect();

    let list_widget = highlighted(List::new(items).block(block));
    frame.render_stateful_widget(list_widget, area, &mut cursor.list_state);
}
