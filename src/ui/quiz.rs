use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{difficulty_for, AnswerOutcome, Question};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };
    let answer = app.engine().answer();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], app);
    render_progress(frame, chunks[1], app);
    render_question_text(frame, chunks[3], question.text());
    render_options(frame, chunks[4], question, app.selected_option(), answer);
    if let Some(answer) = answer {
        render_feedback(frame, chunks[5], answer);
    }
    render_controls(frame, chunks[6], answer.is_some());
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.engine().snapshot();
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let level = Line::from(vec![
        Span::styled(
            format!("Level {}", snapshot.level),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!(" / {}  ·  {}", snapshot.max_level, difficulty_for(snapshot.level)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(level), halves[0]);

    let status = format!(
        "Score {}  ·  {}/{}",
        snapshot.score,
        snapshot.question_index + 1,
        snapshot.questions_per_level
    );
    let widget = Paragraph::new(status)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let progress = app.engine().progress_fraction();
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Indexed(62)).bg(Color::DarkGray))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn option_style(
    option: &str,
    is_selected: bool,
    question: &Question,
    answer: Option<&AnswerOutcome>,
) -> Style {
    match answer {
        Some(_) if option == question.correct_answer() => Style::default().fg(Color::Green).bold(),
        Some(answer) if option == answer.choice => Style::default().fg(Color::Red).bold(),
        Some(_) => Style::default().fg(Color::DarkGray),
        None if is_selected => Style::default().fg(Color::Cyan).bold(),
        None => Style::default().fg(Color::Gray),
    }
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    selected: usize,
    answer: Option<&AnswerOutcome>,
) {
    let options = question.options();
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, (label, option)) in ('A'..='Z').zip(options.iter()).enumerate() {
        let is_selected = index == selected;
        let style = option_style(option, is_selected, question, answer);
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, answer: &AnswerOutcome) {
    let line = if answer.correct {
        Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        ))
    } else {
        Line::from(vec![
            Span::styled("Incorrect! ", Style::default().fg(Color::Red).bold()),
            Span::styled(
                format!("Correct: {}", answer.correct_answer),
                Style::default().fg(Color::Gray),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, area: Rect, answered: bool) {
    let controls = if answered {
        "enter next  ·  s start over  ·  q quit"
    } else {
        "j/k navigate  ·  enter select  ·  q quit"
    };
    let widget = Paragraph::new(controls)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
