use crate::draw::default_border;
use savant_api::PitchingEvent;
use tui::layout::Constraint;
use tui::style::{Color, Modifier, Style};
use tui::widgets::{Cell, Row, Table};

const HEADERS: [&str; 10] = [
    "Pitch", "Batter", "Pitcher", "Outs", "Count", "Spin", "Result", "PC", "Pitch #", "Score",
];

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

/// `PC` is the pitcher's running count, `Pitch #` the pitch's place in the game.
pub fn event_cells(event: &PitchingEvent) -> [String; 10] {
    [
        event.pitch_type.clone(),
        event.batter.clone(),
        event.pitcher.clone(),
        optional(event.outs),
        event.count.clone(),
        optional(event.spin_rate.map(|s| s.round() as i64)),
        event.result.clone(),
        optional(event.pitcher_pitch_count),
        optional(event.game_pitch_number),
        event.score.clone(),
    ]
}

/// Recent pitches, newest first, starting `offset` rows down.
pub fn events_table<'a>(events: &[PitchingEvent], offset: usize) -> Table<'a> {
    let header = Row::new(HEADERS).style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = events
        .iter()
        .skip(offset)
        .map(|event| Row::new(event_cells(event).map(Cell::from)))
        .collect();

    let title = if events.is_empty() {
        " Pitch Feed (no pitches yet) ".to_string()
    } else {
        format!(" Pitch Feed ({}/{}) ", offset.min(events.len() - 1) + 1, events.len())
    };

    Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(default_border(Color::White).title(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui::buffer::Buffer;
    use tui::layout::Rect;
    use tui::widgets::Widget;

    fn event(n: u32, result: &str) -> PitchingEvent {
        event_numbered(n, n, result)
    }

    fn event_numbered(count: u32, number: u32, result: &str) -> PitchingEvent {
        PitchingEvent {
            pitch_type: "Slider".into(),
            batter: "J. Doe".into(),
            pitcher: "A. Smith".into(),
            outs: Some(1),
            count: "1-2".into(),
            spin_rate: Some(2451.6),
            result: result.into(),
            pitcher_pitch_count: Some(count),
            game_pitch_number: Some(number),
            score: "2-1".into(),
        }
    }

    fn rendered(table: Table) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 8));
        table.render(buf.area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn cells_fill_missing_values() {
        let mut e = event(3, "Ball");
        e.outs = None;
        e.spin_rate = None;
        let cells = event_cells(&e);
        assert_eq!(cells[3], "-");
        assert_eq!(cells[5], "-");
        assert_eq!(cells[7], "3");
    }

    #[test]
    fn shows_pitcher_count_and_game_number() {
        let cells = event_cells(&event_numbered(14, 87, "Foul"));
        assert_eq!(cells[7], "14");
        assert_eq!(cells[8], "87");

        let mut e = event_numbered(14, 87, "Foul");
        e.game_pitch_number = None;
        assert_eq!(event_cells(&e)[8], "-");

        let text = rendered(events_table(&[event_numbered(14, 87, "Foul")], 0));
        assert!(text.contains("Pitch #"));
        assert!(text.contains("87"));
    }

    #[test]
    fn spin_is_rounded() {
        assert_eq!(event_cells(&event(1, "Ball"))[5], "2452");
    }

    #[test]
    fn offset_skips_newest_rows() {
        let events = vec![event(2, "Foul"), event(1, "Called Strike")];
        let text = rendered(events_table(&events, 1));
        assert!(text.contains("Called Strike"));
        assert!(!text.contains("Foul"));
        assert!(text.contains("(2/2)"));
    }

    #[test]
    fn renders_empty_input() {
        assert!(rendered(events_table(&[], 0)).contains("no pitches yet"));
    }
}
