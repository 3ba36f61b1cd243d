use crate::draw::default_border;
use savant_api::{PitchRecord, StrikeZone};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::text::{Line, Span};
use tui::widgets::Widget;
use tui::widgets::canvas::{Canvas, Points, Rectangle};

/// Half the width of home plate, in feet.
const PLATE_HALF_WIDTH: f64 = 0.7083;
const X_BOUNDS: [f64; 2] = [-2.5, 2.5];
const Y_BOUNDS: [f64; 2] = [0.0, 5.0];

pub fn pitch_color(pitch_name: &str) -> Color {
    match pitch_name {
        "Changeup" => Color::Red,
        "Curveball" => Color::Blue,
        "Cutter" => Color::Green,
        "Eephus" => Color::Yellow,
        "Forkball" => Color::Rgb(128, 0, 128),
        "Four-Seam Fastball" | "4-Seam Fastball" => Color::Rgb(255, 165, 0),
        "Knuckleball" => Color::Rgb(255, 192, 203),
        "Knuckle Curve" => Color::Cyan,
        "Screwball" => Color::Magenta,
        "Sinker" => Color::Rgb(165, 42, 42),
        "Slider" => Color::LightGreen,
        "Slurve" => Color::Rgb(0, 128, 128),
        "Splitter" => Color::Rgb(0, 0, 128),
        "Sweeper" => Color::Rgb(128, 0, 0),
        _ => Color::Gray,
    }
}

/// Plate locations grouped by pitch name, in order of first appearance.
pub fn group_by_pitch_name(pitches: &[&PitchRecord]) -> Vec<(String, Vec<(f64, f64)>)> {
    let mut groups: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for pitch in pitches {
        let point = (pitch.px, pitch.pz);
        match groups.iter_mut().find(|(name, _)| *name == pitch.pitch_name) {
            Some((_, points)) => points.push(point),
            None => groups.push((pitch.pitch_name.clone(), vec![point])),
        }
    }
    groups
}

/// Scatter of plate locations over the strike zone, seen from the catcher.
pub struct StrikeZoneChart<'a> {
    pub title: String,
    pub pitches: Vec<&'a PitchRecord>,
    pub zone: StrikeZone,
}

impl Widget for StrikeZoneChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let groups = group_by_pitch_name(&self.pitches);
        let zone = self.zone;
        let legend_x = X_BOUNDS[0] + 0.1;

        Canvas::default()
            .block(default_border(Color::White).title(format!(" {} ", self.title)))
            .marker(Marker::Braille)
            .x_bounds(X_BOUNDS)
            .y_bounds(Y_BOUNDS)
            .paint(|ctx| {
                ctx.draw(&Rectangle {
                    x: -PLATE_HALF_WIDTH,
                    y: zone.bottom,
                    width: PLATE_HALF_WIDTH * 2.0,
                    height: (zone.top - zone.bottom).max(0.0),
                    color: Color::Blue,
                });
                for (name, points) in &groups {
                    ctx.draw(&Points { coords: points.as_slice(), color: pitch_color(name) });
                }
                ctx.layer();
                for (i, (name, points)) in groups.iter().enumerate() {
                    let y = Y_BOUNDS[1] - 0.35 * (i as f64 + 1.0);
                    ctx.print(
                        legend_x,
                        y,
                        Line::from(Span::styled(
                            format!("● {name} ({})", points.len()),
                            Style::default().fg(pitch_color(name)),
                        )),
                    );
                }
            })
            .render(area, buf);
    }
}
