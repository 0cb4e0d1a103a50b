use crate::app::{App, Route};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the "Home | Comments" header, highlighting the active route.
///
/// An item page counts as neither; both labels render inactive there.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let tab = |label: &'static str, active: bool| {
        let role = if active { "header_active" } else { "header_inactive" };
        Span::styled(label, app.style(role))
    };

    let mut spans = vec![
        Span::raw(" "),
        tab("Home", app.route == Route::Home),
        Span::styled(" | ", app.style("header_inactive")),
        tab("Comments", app.route == Route::Comments),
    ];
    if let Route::Item(id) = app.route {
        spans.push(Span::styled(format!("  > item {}", id), app.style("story_meta")));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
