use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::events_table::events_table;
use crate::components::field::FieldPanel;
use crate::components::game_list::game_list_lines;
use crate::components::stat_table::{rows_table, statline_table};
use crate::components::strike_zone::StrikeZoneChart;
use crate::components::velocity::VelocityChart;
use crate::components::win_probability::WinProbabilityChart;
use crate::state::driver::PollState;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use savant_api::GameSnapshot;

static TABS: &[&str; 4] = &["Dashboard", "Pitches", "Stats", "Games"];

const HELP_TEXT: &str = "q quit   1-4 tabs   ? help   Esc back   f full screen   \" logs   r refresh now

Dashboard / Pitches:  p next pitcher   P previous pitcher   a all pitchers
Pitches:              j/k scroll the pitch feed
Games:                j/k move   Enter poll the highlighted game   x stop polling   s reload schedule";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Dashboard => draw_dashboard(f, layout.main, app),
            MenuItem::Pitches => draw_pitches(f, layout.main, app),
            MenuItem::Stats => draw_stats(f, layout.main, app),
            MenuItem::Games => draw_games(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = drawn {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Dashboard => 0,
        MenuItem::Pitches => 1,
        MenuItem::Stats => 2,
        MenuItem::Games => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Draws the "nothing to show yet" message when there is no snapshot.
fn with_snapshot<'a>(f: &mut Frame, area: Rect, app: &'a App) -> Option<&'a GameSnapshot> {
    if let Some(snapshot) = app.snapshot() {
        return Some(snapshot);
    }
    let msg = match app.current_target() {
        Some(game_pk) => format!("Waiting for game {game_pk}..."),
        None => "No game selected. Press 4 to pick one from today's schedule.".to_string(),
    };
    draw_placeholder(f, area, &msg);
    None
}

fn scoreline(snapshot: &GameSnapshot, app: &App) -> Line<'static> {
    let away = snapshot.away_team.as_deref().unwrap_or("Away");
    let home = snapshot.home_team.as_deref().unwrap_or("Home");
    let (home_runs, away_runs) = snapshot.score;
    let filter = app.state.pitcher_filter.as_deref().unwrap_or("all pitchers");

    let mut spans = vec![
        Span::styled(
            format!(" {away} {away_runs} @ {home} {home_runs} "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  game #{}", snapshot.game_pk), Style::default().fg(Color::DarkGray)),
        Span::raw(format!("  showing {filter} ({} pitches)", snapshot.pitch_count())),
    ];
    let stale = app.state.driver.stale_ticks();
    if stale > 0 {
        spans.push(Span::styled(
            format!("  stale: {stale} failed refreshes"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let Some(snapshot) = with_snapshot(f, area, app) else {
        return;
    };

    let [header, charts, details] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Percentage(60),
        Constraint::Fill(1),
    ])
    .areas(area);
    f.render_widget(Paragraph::new(scoreline(snapshot, app)), header);

    let [zone_area, current_area, wp_area] = Layout::horizontal([
        Constraint::Percentage(34),
        Constraint::Percentage(33),
        Constraint::Percentage(33),
    ])
    .areas(charts);

    let filter = app.state.pitcher_filter.as_deref();
    f.render_widget(
        StrikeZoneChart {
            title: filter.map_or_else(|| "All Pitches".to_string(), |name| format!("Pitches: {name}")),
            pitches: snapshot.pitches_for(filter),
            zone: snapshot.strike_zone,
        },
        zone_area,
    );

    let play = &snapshot.current_play;
    f.render_widget(
        StrikeZoneChart {
            title: format!("Current AB: {}", play.batter_name.as_deref().unwrap_or("-")),
            pitches: snapshot.current_pitches.iter().collect(),
            zone: snapshot.strike_zone,
        },
        current_area,
    );
    f.render_widget(
        WinProbabilityChart {
            series: snapshot.win_probability.as_ref(),
            caption: snapshot.current_result.as_deref(),
        },
        wp_area,
    );

    let [field_area, tables_area] =
        Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)]).areas(details);
    f.render_widget(
        FieldPanel {
            batter: play.batter_name.as_deref(),
            pitcher: play.pitcher_name.as_deref(),
            count: play.count,
            runners: &snapshot.runners,
            defenders: &snapshot.defenders,
        },
        field_area,
    );
    draw_matchup_stats(f, tables_area, app);
}

fn draw_matchup_stats(f: &mut Frame, area: Rect, app: &App) {
    let [pitcher_area, batter_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let matchup = &app.state.matchup;
    f.render_widget(statline_table("Pitcher", matchup.pitcher.as_ref()), pitcher_area);
    f.render_widget(statline_table("Batter", matchup.batter.as_ref()), batter_area);
}

fn draw_pitches(f: &mut Frame, area: Rect, app: &App) {
    let Some(snapshot) = with_snapshot(f, area, app) else {
        return;
    };

    let [header, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
    f.render_widget(Paragraph::new(scoreline(snapshot, app)), header);

    let [velocity_area, feed_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(body);
    f.render_widget(
        VelocityChart { pitches: snapshot.pitches_for(app.state.pitcher_filter.as_deref()) },
        velocity_area,
    );
    f.render_widget(events_table(&snapshot.events, app.state.events_scroll), feed_area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    if with_snapshot(f, area, app).is_none() {
        return;
    }
    let stats = &app.state.team_stats;

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let [batting_area, pitching_area] =
        Layout::vertical([Constraint::Length(7), Constraint::Length(7)]).areas(left);

    f.render_widget(
        rows_table("Team Batting", &stats.batting.iter().collect::<Vec<_>>()),
        batting_area,
    );
    f.render_widget(
        rows_table("Team Pitching", &stats.pitching.iter().collect::<Vec<_>>()),
        pitching_area,
    );
    f.render_widget(
        rows_table(
            &format!("{} Batters", stats.roster_team),
            &stats.roster.iter().collect::<Vec<_>>(),
        ),
        right,
    );
}

fn draw_games(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Today's Games ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let schedule = &app.state.schedule;
    if schedule.games.is_empty() {
        let msg = if schedule.loaded {
            "No games on today's schedule. Press s to reload."
        } else {
            "Loading schedule..."
        };
        f.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let status = match app.state.driver.state() {
        PollState::Idle => "Idle".to_string(),
        PollState::Polling(game_pk) => format!("Polling game #{game_pk}"),
    };
    let mut lines = vec![
        Line::styled(
            format!("{status}   j/k to move, Enter to poll, x to stop, s to reload"),
            Style::default().fg(Color::DarkGray),
        ),
        Line::default(),
    ];
    lines.extend(game_list_lines(&schedule.games, schedule.selected, app.current_target()));
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
