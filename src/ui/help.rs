//! Help overlay: scrollable keybinding table.
//!
//! The section for the keys active right now comes first; the rest follow in
//! a fixed order. Keys bound to the same action share one row, and each
//! section opens with a line about how that route behaves under the current
//! config.

use crate::app::App;
use crate::comments::ReplyPlacement;
use crate::keybindings::{Action as KbAction, Context};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

/// Context display order and labels for the help screen.
const CONTEXT_ORDER: [(Context, &str); 5] = [
    (Context::Global, "General"),
    (Context::Stories, "Story List"),
    (Context::Detail, "Item"),
    (Context::Feed, "Comments Feed"),
    (Context::Composer, "Comment Form"),
];

#[derive(Debug, PartialEq, Eq)]
enum HelpRow {
    Heading(&'static str),
    Note(String),
    Binding { keys: String, description: &'static str },
    Blank,
}

fn section_note(app: &App, ctx: Context) -> Option<String> {
    match ctx {
        Context::Global => None,
        Context::Stories => Some(format!(
            "{} stories, refreshed every {}s",
            app.config.story_count, app.stories.period
        )),
        Context::Detail => Some(match app.config.reply_placement {
            ReplyPlacement::Nested => "Replies nest under their parent; nothing is posted".to_string(),
            ReplyPlacement::Legacy => {
                "Replies are also listed at the top level; nothing is posted".to_string()
            }
        }),
        Context::Feed => Some(format!(
            "Newest {} comments; Enter opens the parent item",
            app.config.comment_feed_count
        )),
        Context::Composer => Some(format!(
            "Fields: Text, Author (empty author posts as \"{}\")",
            app.config.default_author
        )),
    }
}

fn help_rows(app: &App) -> Vec<HelpRow> {
    let bindings = app.keybindings.all_bindings();
    let active = app.context();
    let sections = CONTEXT_ORDER
        .iter()
        .filter(|(ctx, _)| *ctx == active)
        .chain(CONTEXT_ORDER.iter().filter(|(ctx, _)| *ctx != active));

    let mut rows = Vec::new();
    for (ctx, label) in sections {
        // One entry per action, keys in registration order.
        let mut grouped: Vec<(KbAction, Vec<&str>, &'static str)> = Vec::new();
        for (_, key, action, description) in bindings.iter().filter(|(c, ..)| c == ctx) {
            match grouped.iter_mut().find(|(a, ..)| a == action) {
                Some((_, keys, _)) => keys.push(key),
                None => grouped.push((*action, vec![key.as_str()], *description)),
            }
        }
        if grouped.is_empty() {
            continue;
        }

        rows.push(HelpRow::Heading(*label));
        if let Some(note) = section_note(app, *ctx) {
            rows.push(HelpRow::Note(note));
        }
        rows.extend(grouped.into_iter().map(|(_, keys, description)| HelpRow::Binding {
            keys: keys.join(" / "),
            description,
        }));
        rows.push(HelpRow::Blank);
    }
    rows.pop();
    rows
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let overlay = centered_rect(80, 80, area);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows: Vec<Row> = help_rows(app)
        .into_iter()
        .map(|row| match row {
            HelpRow::Heading(label) => Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("help_heading")),
            HelpRow::Note(note) => Row::new(vec![String::new(), note]).style(app.style("help_hint")),
            HelpRow::Binding { keys, description } => {
                Row::new(vec![format!("  {}", keys), description.to_string()])
            }
            HelpRow::Blank => Row::new(vec![String::new(), String::new()]),
        })
        .collect();

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize; // -2 border -1 header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(visible_rows, [Constraint::Length(18), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
                .bottom_margin(1),
        )
        .style(app.style("comment_body"));

    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Span::styled(" j/k to scroll, ? or Esc to close ", app.style("help_hint"))),
            hint_area,
        );
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HnClient, Item};
    use crate::app::Route;
    use crate::config::Config;
    use crate::views::DetailView;

    fn test_app() -> App {
        let config = Config::default();
        let client = HnClient::from_config(&config).unwrap();
        App::new(client, config)
    }

    fn headings(rows: &[HelpRow]) -> Vec<&'static str> {
        rows.iter()
            .filter_map(|r| match r {
                HelpRow::Heading(label) => Some(*label),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(80, 80, parent);
        assert_eq!(rect, Rect::new(10, 4, 80, 32));
    }

    #[tokio::test]
    async fn test_active_section_listed_first() {
        let app = test_app();
        assert_eq!(
            headings(&help_rows(&app)),
            vec!["Story List", "General", "Item", "Comments Feed", "Comment Form"]
        );
    }

    #[tokio::test]
    async fn test_keys_for_one_action_share_a_row() {
        let app = test_app();
        let rows = help_rows(&app);
        assert!(rows.contains(&HelpRow::Binding {
            keys: "j / Down".to_string(),
            description: KbAction::NavDown.describe(),
        }));
    }

    #[tokio::test]
    async fn test_composer_section_names_fields_and_default_author() {
        let mut app = test_app();
        let mut detail = DetailView::new(3, ReplyPlacement::Nested, "Anonymous");
        detail.begin_load(1);
        detail.apply_item(1, Item { id: 3, ..Item::default() });
        detail.open_composer();
        app.route = Route::Item(3);
        app.detail = Some(detail);

        let rows = help_rows(&app);
        assert_eq!(rows[0], HelpRow::Heading("Comment Form"));
        assert_eq!(
            rows[1],
            HelpRow::Note("Fields: Text, Author (empty author posts as \"Anonymous\")".to_string())
        );
        assert!(matches!(&rows[2], HelpRow::Binding { keys, .. } if keys == "Enter"));
    }
}
