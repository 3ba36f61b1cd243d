use crate::draw::default_border;
use savant_api::WinProbabilitySeries;
use tui::buffer::Buffer;
use tui::layout::{Alignment, Constraint, Rect};
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget};

/// (game state index, percent) pairs for a [0, 1] probability series.
pub fn series_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p * 100.0))
        .collect()
}

pub struct WinProbabilityChart<'a> {
    pub series: Option<&'a WinProbabilitySeries>,
    /// Shown under the chart title, usually the last play's description.
    pub caption: Option<&'a str>,
}

impl Widget for WinProbabilityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = default_border(Color::White).title(" Win Probability ");
        if let Some(caption) = self.caption {
            block = block.title_bottom(format!(" {caption} "));
        }

        let Some(series) = self.series.filter(|s| !s.is_empty()) else {
            Paragraph::new("No win probability data")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        };

        let home = series_points(&series.home);
        let away = series_points(&series.away);
        let x_max = (series.len().saturating_sub(1)).max(1) as f64;
        let (home_now, away_now) = series.latest().unwrap_or_default();

        let datasets = vec![
            Dataset::default()
                .name(format!("{} {:.1}%", series.home_team, home_now * 100.0))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Blue))
                .data(&home),
            Dataset::default()
                .name(format!("{} {:.1}%", series.away_team, away_now * 100.0))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Red))
                .data(&away),
        ];

        Chart::new(datasets)
            .block(block)
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, x_max]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, 100.0])
                    .labels(["0", "50", "100"]),
            )
            .render(area, buf);
    }
}
