use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Hints shown per context when no status message is pending.
fn hints(context: Context) -> &'static [(Action, &'static str)] {
    match context {
        Context::Stories => &[
            (Action::Refresh, "refresh"),
            (Action::CycleOrdering, "sort"),
            (Action::Select, "open"),
            (Action::OpenInBrowser, "browser"),
            (Action::GoComments, "comments"),
            (Action::ShowHelp, "help"),
            (Action::Quit, "quit"),
        ],
        Context::Detail => &[
            (Action::Compose, "comment"),
            (Action::ToggleReply, "reply"),
            (Action::OpenInBrowser, "browser"),
            (Action::Back, "back"),
            (Action::ShowHelp, "help"),
            (Action::Quit, "quit"),
        ],
        Context::Feed => &[
            (Action::Select, "open parent"),
            (Action::OpenInBrowser, "parent in browser"),
            (Action::Refresh, "refresh"),
            (Action::GoHome, "home"),
            (Action::Quit, "quit"),
        ],
        Context::Composer => &[
            (Action::SubmitComment, "submit"),
            (Action::SwitchField, "text/author"),
            (Action::CancelCompose, "cancel"),
        ],
        Context::Global => &[(Action::ShowHelp, "help"), (Action::Quit, "quit")],
    }
}

/// Formats the key hints for `context` from the live bindings, so remapped
/// keys show up as remapped.
pub(super) fn hint_line(app: &App, context: Context) -> String {
    hints(context)
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_hint(*action, context)
                .map(|key| format!("[{}] {}", key, label))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
        None => Cow::Owned(hint_line(app, app.context())),
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HnClient;
    use crate::config::Config;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_hints_follow_overrides() {
        let config = Config {
            keybindings: HashMap::from([("refresh".to_string(), "F5".to_string())]),
            ..Config::default()
        };
        let client = HnClient::from_config(&config).unwrap();
        let app = App::new(client, config);

        let line = hint_line(&app, Context::Stories);
        assert!(line.starts_with("[F5] refresh"), "got: {}", line);
        assert!(line.contains("[q] quit"));
    }

    #[tokio::test]
    async fn test_composer_hints_use_form_keys() {
        let config = Config::default();
        let client = HnClient::from_config(&config).unwrap();
        let app = App::new(client, config);

        assert_eq!(
            hint_line(&app, Context::Composer),
            "[Enter] submit  [Tab] text/author  [Esc] cancel"
        );
    }
}
