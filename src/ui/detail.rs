//! Item detail widget: story header, indented comment tree and the
//! comment/reply forms.

use crate::api::Item;
use crate::app::App;
use crate::comments::{Comment, FlatComment};
use crate::util::{html_to_text, now_unix, strip_control_chars, time_since, wrap_text};
use crate::views::{Composer, ComposerField, ComposerTarget, DetailView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::render::loading_label;

/// Indentation per nesting level, in columns.
const INDENT: usize = 2;
/// Deeper levels render at this indent so bodies keep some width.
const MAX_VISUAL_DEPTH: usize = 12;
/// Story text lines shown in the header before it is cut.
const MAX_STORY_TEXT_LINES: usize = 6;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = app.detail.as_ref() else {
        return;
    };
    if area.width < 10 || area.height < 8 {
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let header = header_lines(app, detail, inner_width);
    let header_height = (header.len() as u16 + 2).min(area.height / 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border")),
        ),
        chunks[0],
    );

    render_comments(f, app, detail, chunks[1]);
    render_composer(f, app, detail, chunks[2]);
}

/// Title, "{score} points by {by} - {age}", URL, then any story text.
fn header_lines(app: &App, detail: &DetailView, width: usize) -> Vec<Line<'static>> {
    let Some(item) = detail.item.as_ref() else {
        return vec![Line::from(loading_label(app))];
    };

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(item.title()).into_owned(),
            app.style("story_title").add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(story_byline(item, now_unix()), app.style("story_meta"))),
        Line::from(Span::styled(item.link(), app.style("feed_link"))),
    ];

    if let Some(text) = item.text.as_deref().filter(|t| !t.is_empty()) {
        let wrapped = wrap_text(&html_to_text(text), width.max(1));
        let cut = wrapped.len() > MAX_STORY_TEXT_LINES;
        lines.push(Line::from(""));
        lines.extend(
            wrapped
                .into_iter()
                .take(MAX_STORY_TEXT_LINES)
                .map(|l| Line::from(Span::styled(l, app.style("comment_body")))),
        );
        if cut {
            lines.push(Line::from(Span::styled("...", app.style("story_meta"))));
        }
    }
    lines
}

/// "`{score} points by {by} - {age}`"
pub(super) fn story_byline(item: &Item, now: i64) -> String {
    format!(
        "{} points by {} - {}",
        item.score,
        strip_control_chars(item.author()),
        time_since(item.time, now)
    )
}

fn render_comments(f: &mut Frame, app: &App, detail: &DetailView, area: Rect) {
    let rows = detail.rows();
    let title = if detail.comments_loading {
        format!(" Comments  {} ", loading_label(app))
    } else {
        format!(" Comments ({}) ", rows.len())
    };
    let focused = detail.focus.is_none();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            app.style("panel_border_focused")
        } else {
            app.style("panel_border")
        })
        .title(title);

    if rows.is_empty() {
        let text = if detail.comments_loading || detail.item.is_none() {
            String::new()
        } else {
            "No comments yet. Press c to write one.".to_string()
        };
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let now = now_unix();
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_span = (0, 0);

    for (i, row) in rows.iter().enumerate() {
        let start = lines.len();
        let selected = i == detail.selected;
        comment_lines(app, detail, row, selected, width, now, &mut lines);
        if selected {
            selected_span = (start, lines.len());
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = scroll_to_show(selected_span, visible);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

/// Top line offset that keeps `(start, end)` on screen, preferring to show
/// the start of the selected comment.
fn scroll_to_show((start, end): (usize, usize), visible: usize) -> usize {
    if visible == 0 || end <= visible {
        0
    } else if end - start > visible {
        start
    } else {
        end - visible
    }
}

fn comment_lines(
    app: &App,
    detail: &DetailView,
    row: &FlatComment<'_>,
    selected: bool,
    width: usize,
    now: i64,
    out: &mut Vec<Line<'static>>,
) {
    let comment = row.comment;
    let indent = " ".repeat(row.depth.min(MAX_VISUAL_DEPTH) * INDENT);
    let body_width = width.saturating_sub(indent.len() + 2).max(10);
    let marker = if selected { "> " } else { "  " };

    let author_style = if selected {
        app.style("comment_selected")
    } else {
        app.style("comment_author")
    };
    let mut byline = vec![
        Span::raw(format!("{}{}", indent, marker)),
        Span::styled(strip_control_chars(&comment.author).into_owned(), author_style),
        Span::styled(format!(" {}", time_since(comment.time, now)), app.style("comment_age")),
    ];
    if comment.is_local() {
        byline.push(Span::styled(" [local]", app.style("comment_local")));
    }
    let replying = detail.replying_to == Some(comment.id);
    byline.push(Span::styled(
        if replying { "  [cancel reply]" } else { "  [reply]" },
        app.style("reply_marker"),
    ));
    out.push(Line::from(byline));

    let body_indent = format!("{}  ", indent);
    for line in wrap_text(&body_text(comment), body_width) {
        out.push(Line::from(vec![
            Span::raw(body_indent.clone()),
            Span::styled(line, app.style("comment_body")),
        ]));
    }

    let unresolved = comment.unresolved_count();
    if unresolved > 0 {
        out.push(Line::from(Span::styled(
            format!("{}[{} more replies not loaded]", body_indent, unresolved),
            app.style("story_meta"),
        )));
    }

    if replying {
        out.extend(form_lines(app, &detail.reply_composer, &body_indent, true));
    }
    out.push(Line::from(""));
}

/// Display text for a comment body. Fetched bodies are HTML; local ones are
/// shown as typed.
fn body_text(comment: &Comment) -> String {
    if comment.deleted {
        return "[deleted]".to_string();
    }
    if comment.dead {
        return "[dead]".to_string();
    }
    if comment.is_local() {
        strip_control_chars(&comment.text).into_owned()
    } else {
        html_to_text(&comment.text)
    }
}

/// The two input rows of a form, with a cursor on the focused field.
fn form_lines(app: &App, composer: &Composer, indent: &str, focused: bool) -> Vec<Line<'static>> {
    let field = |label: &str, value: &str, active: bool| {
        let cursor = if focused && active { "_" } else { "" };
        let style = if focused && active {
            app.style("composer_border").add_modifier(Modifier::BOLD)
        } else {
            app.style("composer_border")
        };
        Line::from(vec![
            Span::raw(indent.to_string()),
            Span::styled(format!("{:<8}", label), style),
            Span::styled(format!("{}{}", value, cursor), app.style("comment_body")),
        ])
    };
    vec![
        field("Text:", &composer.text, composer.field == ComposerField::Text),
        field("Author:", &composer.author, composer.field == ComposerField::Author),
    ]
}

fn render_composer(f: &mut Frame, app: &App, detail: &DetailView, area: Rect) {
    let focused = detail.focus == Some(ComposerTarget::Comment);
    let border_style = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let title = if focused {
        " New comment (local only) "
    } else {
        " New comment: press c "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let lines = form_lines(app, &detail.composer, "", focused);
    f.render_widget(Paragraph::new(lines).block(block).style(Style::default()), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{CommentId, ParentRef};

    #[test]
    fn test_story_byline_format() {
        let item = Item {
            id: 1,
            by: Some("dang".into()),
            score: 120,
            time: 1_000,
            ..Item::default()
        };
        assert_eq!(story_byline(&item, 1_000 + 3_700), "120 points by dang - 1 hours ago");
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        assert_eq!(scroll_to_show((0, 4), 10), 0);
        assert_eq!(scroll_to_show((20, 24), 10), 14);
        // Taller than the viewport: show its start
        assert_eq!(scroll_to_show((20, 40), 10), 20);
    }

    #[test]
    fn test_local_body_is_not_parsed_as_html() {
        let comment = Comment::local(1, "me", "a <b> c &amp; d", ParentRef::Story(9), 0);
        assert_eq!(body_text(&comment), "a <b> c &amp; d");
    }

    #[test]
    fn test_fetched_body_is_converted() {
        let comment = Comment {
            id: CommentId::Fetched(3),
            author: "x".into(),
            text: "one<p>two &amp; three".into(),
            parent: None,
            time: 0,
            deleted: false,
            dead: false,
            children: Default::default(),
        };
        assert_eq!(body_text(&comment), "one\n\ntwo & three");
    }
}
