use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;
use crate::models::{difficulty_for, Phase};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let level = app.engine().level();
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(9),
        Constraint::Percentage(40),
    ])
    .split(area);

    let heading = if app.phase() == Phase::LevelTransition {
        format!("LEVEL {} COMPLETE", level - 1)
    } else {
        "TRIVIA QUIZ".to_string()
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];

    match app.last_error() {
        Some(error) => {
            content.push(Line::from(Span::styled(
                error,
                Style::default().fg(Color::Red).bold(),
            )));
            content.push(Line::from(""));
            content.push(Line::from(""));
            content.push(Line::from(controls_hint(app.can_retry()).fg(Color::DarkGray)));
        }
        None => {
            content.push(Line::from(Span::styled(
                format!(
                    "Loading level {} ({})...",
                    level,
                    difficulty_for(level)
                ),
                Style::default().fg(Color::Yellow),
            )));
            content.push(Line::from(""));
            content.push(Line::from(""));
            content.push(Line::from(controls_hint(false).fg(Color::DarkGray)));
        }
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn controls_hint(can_retry: bool) -> &'static str {
    if can_retry {
        "r retry  ·  s start over  ·  q quit"
    } else {
        "s start over  ·  q quit"
    }
}
