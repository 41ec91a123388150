mod loading;
mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, AppState};
use crate::models::Phase;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Welcome => welcome::render(frame, area, app),
        AppState::Playing => match app.phase() {
            Phase::Loading | Phase::LevelTransition => loading::render(frame, area, app),
            Phase::Active => quiz::render(frame, area, app),
            Phase::Finished => result::render(frame, area, app),
        },
    }
}
