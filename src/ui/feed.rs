use crate::api::discussion_url;
use crate::app::App;
use crate::util::{format_timestamp, html_to_text, strip_control_chars, wrap_text};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::render::loading_label;

/// Render the newest-comments feed: a flat list, or the generic error.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let view = &app.feed;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(" New Comments ");

    if let Some(error) = view.error {
        let paragraph = Paragraph::new(Span::styled(error, app.style("error"))).block(block);
        f.render_widget(paragraph, area);
        return;
    }
    if view.comments.is_empty() {
        let text = if view.loading {
            loading_label(app)
        } else {
            "No comments".to_string()
        };
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let width = area.width.saturating_sub(4).max(10) as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_start = 0;

    for (i, comment) in view.comments.iter().enumerate() {
        let selected = i == view.selected;
        if selected {
            selected_start = lines.len();
        }
        let author_style = if selected {
            app.style("comment_selected")
        } else {
            app.style("comment_author")
        };
        lines.push(Line::from(vec![
            Span::raw(if selected { "> " } else { "  " }),
            Span::styled(strip_control_chars(comment.author()).into_owned(), author_style),
            Span::styled(format!("  {}", format_timestamp(comment.time)), app.style("comment_age")),
        ]));
        for line in wrap_text(&html_to_text(comment.text.as_deref().unwrap_or_default()), width) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line, app.style("comment_body")),
            ]));
        }
        if let Some(parent) = comment.parent {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("View parent post: {}", discussion_url(parent)),
                    app.style("feed_link"),
                ),
            ]));
        }
        lines.push(Line::from(""));
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = selected_start.saturating_sub(visible / 3);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}
