// Job log viewer.
// Shows a job trace word-wrapped and scrollable, minus terminal control codes.

use ratatui::{prelude::*, widgets::*};

use crate::view::LogScroll;

const ESC: char = '\u{1b}';
const BEL: char = '\u{7}';

/// Strip GitLab section markers, ANSI escape sequences, and carriage returns.
/// Lines that held nothing but markers are dropped.
pub fn sanitize(raw: &str) -> String {
    raw.split('\n')
        .filter_map(|line| {
            let clean = strip_escapes(&strip_section_markers(line));
            if clean.is_empty() && !line.is_empty() {
                None
            } else {
                Some(clean)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_escapes(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.next() {
                // CSI: parameters then a final byte in @..~
                Some('[') => {
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: terminated by BEL or ESC \
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC {
                            chars.next_if_eq(&'\\');
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Remove `section_start:<ts>:<name>\r` and `section_end:<ts>:<name>\r` tokens.
fn strip_section_markers(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    loop {
        let found = ["section_start:", "section_end:"]
            .iter()
            .filter_map(|prefix| rest.find(prefix).map(|at| (at, prefix.len())))
            .min();
        let Some((at, prefix_len)) = found else {
            break;
        };

        let after = &rest[at + prefix_len..];
        match after.find('\r') {
            Some(cr) if is_marker_body(&after[..cr]) => {
                out.push_str(&rest[..at]);
                rest = &after[cr + 1..];
            }
            _ => {
                out.push_str(&rest[..at + prefix_len]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// `<digits>:<name>`, where the name may carry `[collapsed=true]` options.
fn is_marker_body(body: &str) -> bool {
    match body.split_once(':') {
        Some((timestamp, name)) => {
            !timestamp.is_empty()
                && timestamp.chars().all(|c| c.is_ascii_digit())
                && !name.is_empty()
                && !name.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Render the log pane and record its scroll bounds for the key handler.
pub fn draw_log_view(
    frame: &mut Frame,
    job_id: u64,
    job_name: &str,
    log: &str,
    scroll: &mut LogScroll,
    area: Rect,
) {
    let text = sanitize(log);
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);

    if text.is_empty() {
        scroll.set_bounds(0, inner.height);
        let empty = Paragraph::new("Log is empty")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block.title(format!(" Job {} · {} ", job_id, job_name)));
        frame.render_widget(empty, area);
        return;
    }

    // Rows are counted after wrapping so the tail of long lines stays reachable.
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    let rows = paragraph.line_count(inner.width);
    scroll.set_bounds(rows, inner.height);

    let title = format!(
        " Job {} · {} [{}/{}] ",
        job_id,
        job_name,
        usize::from(scroll.offset) + 1,
        rows
    );
    let paragraph = paragraph
        .block(block.title(title))
        .scroll((scroll.offset, 0));
    frame.render_widget(paragraph, area);
}
