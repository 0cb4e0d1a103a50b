use crate::api::{Item, Listing};
use crate::app::App;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::loading_label;

/// Render the story list: ordering tabs and countdown, then one two-line
/// row per story.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 4 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_toolbar(f, app, chunks[0]);

    let view = &app.stories;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(format!(" {} ", view.ordering.label()));

    if view.stories.is_empty() {
        let text = if view.loading {
            loading_label(app)
        } else {
            "No stories".to_string()
        };
        f.render_widget(Paragraph::new(text).block(block), chunks[1]);
        return;
    }

    let width = chunks[1].width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = view
        .stories
        .iter()
        .enumerate()
        .map(|(i, story)| story_row(app, i, story, i == view.selected, width))
        .collect();

    let list = List::new(items).block(block).highlight_style(Style::default());
    let mut state = ListState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

/// "Top | Best | New" with the current ordering highlighted, and the
/// countdown to the next automatic refresh.
fn render_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let view = &app.stories;
    let mut spans = vec![Span::raw(" ")];
    for (i, ordering) in Listing::STORY_ORDERINGS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", app.style("header_inactive")));
        }
        let role = if *ordering == view.ordering {
            "header_active"
        } else {
            "header_inactive"
        };
        let short = ordering.label().trim_end_matches(" Stories");
        spans.push(Span::styled(short, app.style(role)));
    }
    spans.push(Span::styled(
        format!("   Next update in: {}s", view.countdown),
        app.style("countdown"),
    ));
    if view.loading && !view.stories.is_empty() {
        spans.push(Span::styled(format!("  {}", loading_label(app)), app.style("story_meta")));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn story_row(app: &App, index: usize, story: &Item, selected: bool, width: usize) -> ListItem<'static> {
    let title_style = if selected {
        app.style("story_selected")
    } else {
        app.style("story_title")
    };

    let rank = format!("{:>2}. ", index + 1);
    let domain = story.domain().map(|d| format!(" ({})", d)).unwrap_or_default();
    let title_width = width.saturating_sub(rank.len() + domain.len());
    let title = strip_control_chars(story.title());
    let title = truncate_to_width(&title, title_width).into_owned();

    let meta = format!(
        "    {} points by {} | {} comments",
        story.score,
        strip_control_chars(story.author()),
        story.descendants
    );

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(rank, app.style("story_rank")),
            Span::styled(title, title_style),
            Span::styled(domain, app.style("story_meta")),
        ]),
        Line::from(Span::styled(meta, app.style("story_meta"))),
    ])
}
