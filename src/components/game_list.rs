use chrono::Local;
use savant_api::ScheduledGame;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};

pub fn game_label(game: &ScheduledGame) -> String {
    let when = game
        .start_time
        .map(|t| t.with_timezone(&Local).format("%I:%M%p").to_string())
        .unwrap_or_else(|| "--:--".into());
    let status = game.status.as_deref().unwrap_or("Scheduled");
    format!("{} @ {}  {when}  [{status}]", game.away_team, game.home_team)
}

/// One line per game; `>` marks the highlight, `*` the game being polled.
pub fn game_list_lines(
    games: &[ScheduledGame],
    selected: usize,
    polling: Option<u64>,
) -> Vec<Line<'static>> {
    games
        .iter()
        .enumerate()
        .map(|(idx, game)| {
            let marker = if idx == selected { ">" } else { " " };
            let live = if polling == Some(game.game_pk) { "*" } else { " " };
            let style = if idx == selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{marker}{live} ")),
                Span::styled(game_label(game), style),
                Span::styled(format!("  #{}", game.game_pk), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect()
}
