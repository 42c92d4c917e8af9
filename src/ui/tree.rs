// Group/project tree rendering.

use ratatui::{prelude::*, widgets::*};

use crate::state::{NodeRef, TreeNode};
use crate::view::TreeCursor;

use super::list::render_empty;

/// Label shown for a tree node.
pub fn node_label(node: &TreeNode) -> String {
    match node.node_ref {
        NodeRef::Group { .. } => format!("Group: {}", node.name),
        NodeRef::Project { .. } => format!("Project: {}", node.name),
    }
}

/// Render the tree of groups and their projects.
pub fn draw_tree(frame: &mut Frame, groups: &[TreeNode], cursor: &mut TreeCursor, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(Span::styled(
            " GitLab Pipelines ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    if groups.is_empty() {
        frame.render_widget(block, area);
        render_empty(frame, area.inner(Margin::new(1, 1)), "No groups found");
        return;
    }

    let items: Vec<ListItem> = cursor
        .visible_rows(groups)
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let (marker, color) = match row.node.node_ref {
                NodeRef::Group { .. } if row.expanded => ("[-] ", Color::White),
                NodeRef::Group { .. } => ("[+] ", Color::White),
                NodeRef::Project { .. } => ("├─ ", Color::Blue),
            };
            let mut spans = vec![
                Span::raw(indent),
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(node_label(row.node), Style::default().fg(color)),
            ];
            // Subgroups share short names; the full path tells them apart.
            if matches!(row.node.node_ref, NodeRef::Group { .. }) && row.node.path != row.node.name {
                spans.push(Span::styled(
                    format!("  {}", row.node.path),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut cursor.list_state);
}
