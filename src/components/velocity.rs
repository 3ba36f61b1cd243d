use crate::draw::default_border;
use savant_api::PitchRecord;
use tui::buffer::Buffer;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget};

/// (pitch index, value) for every pitch that has the measurement.
pub fn measure_points(
    pitches: &[&PitchRecord],
    measure: impl Fn(&PitchRecord) -> Option<f64>,
) -> Vec<(f64, f64)> {
    pitches
        .iter()
        .enumerate()
        .filter_map(|(i, p)| measure(p).map(|v| (i as f64, v)))
        .collect()
}

/// Y bounds padded around the observed values.
pub fn padded_bounds(points: &[(f64, f64)], pad: f64) -> [f64; 2] {
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
    if lo > hi {
        return [0.0, 1.0];
    }
    [(lo - pad).max(0.0), hi + pad]
}

/// Start speed and spin rate, pitch by pitch, stacked.
pub struct VelocityChart<'a> {
    pub pitches: Vec<&'a PitchRecord>,
}

impl Widget for VelocityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [speed_area, spin_area] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

        let speed = measure_points(&self.pitches, |p| p.start_speed);
        let spin = measure_points(&self.pitches, |p| p.spin_rate);
        let x_max = (self.pitches.len().saturating_sub(1)).max(1) as f64;

        series_chart(" Start Speed (mph) ", &speed, x_max, 2.0, Color::Yellow)
            .render(speed_area, buf);
        series_chart(" Spin Rate (rpm) ", &spin, x_max, 100.0, Color::Cyan).render(spin_area, buf);
    }
}

enum SeriesChart<'a> {
    Empty(Paragraph<'a>),
    Chart(Chart<'a>),
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self {
            SeriesChart::Empty(p) => p.render(area, buf),
            SeriesChart::Chart(c) => c.render(area, buf),
        }
    }
}

fn series_chart<'a>(
    title: &'a str,
    points: &'a [(f64, f64)],
    x_max: f64,
    pad: f64,
    color: Color,
) -> SeriesChart<'a> {
    let block = default_border(Color::White).title(title);
    if points.is_empty() {
        return SeriesChart::Empty(
            Paragraph::new("No pitches")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
        );
    }

    let [lo, hi] = padded_bounds(points, pad);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(points);

    SeriesChart::Chart(
        Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, x_max]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([lo, hi])
                    .labels([format!("{lo:.0}"), format!("{hi:.0}")]),
            ),
    )
}
