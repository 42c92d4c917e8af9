// Modal UI components.
// Centered button dialogs used for branch choice and job actions.

use ratatui::{prelude::*, widgets::*};

const MODAL_WIDTH: u16 = 60;

/// Draw a centered modal with a prompt and a row of buttons.
pub fn draw_button_modal(frame: &mut Frame, prompt: &str, buttons: &[&str], focused: usize) {
    let area = frame.area();
    let modal_width = MODAL_WIDTH.min(area.width);
    let (button_lines, focused_line) =
        layout_buttons(buttons, focused, modal_width.saturating_sub(4));

    // Borders, blank line, prompt, blank line, buttons, instructions
    let wanted = 5 + button_lines.len() as u16 + 1;
    let modal_height = wanted.min(area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            prompt.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(button_lines);
    lines.push(Line::from(vec![
        Span::styled("←→", Style::default().fg(Color::Yellow)),
        Span::styled(" = Move  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Choose", Style::default().fg(Color::DarkGray)),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    // Keep the focused button in view when the buttons overflow the screen.
    let focused_row = (3 + focused_line) as u16;
    let scroll = (focused_row + 1).saturating_sub(modal_height.saturating_sub(2));

    let modal = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .scroll((scroll, 0));
    frame.render_widget(modal, modal_area);
}

/// Pack buttons into centered lines no wider than `width`. Also returns the
/// index of the line holding the focused button.
fn layout_buttons<'a>(buttons: &'a [&str], focused: usize, width: u16) -> (Vec<Line<'a>>, usize) {
    let width = usize::from(width).max(1);
    let mut lines = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0;
    let mut focused_line = 0;

    for (i, label) in buttons.iter().enumerate() {
        let cell = label.chars().count() + 4;
        if used > 0 && used + cell > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }

        let style = if i == focused {
            focused_line = lines.len();
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw("  "));
        used += cell;
    }

    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    (lines, focused_line)
}
