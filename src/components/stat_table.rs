use crate::draw::default_border;
use savant_api::stats::{FormattedRow, StatLine};
use tui::layout::Constraint;
use tui::style::{Color, Modifier, Style};
use tui::widgets::{Cell, Row, Table};

const LABEL_WIDTH: u16 = 20;
const VALUE_WIDTH: u16 = 7;

/// Player, league and team rows for one statline. A lookup miss renders a
/// single "no stats" row rather than an empty grid.
pub fn statline_table<'a>(title: &str, line: Option<&StatLine>) -> Table<'a> {
    match line {
        Some(line) => rows_table(title, &line.rows()),
        None => empty_table(title, "No season stats found"),
    }
}

/// One row per formatted record, sharing the first record's columns.
pub fn rows_table<'a>(title: &str, rows: &[&FormattedRow]) -> Table<'a> {
    let Some(first) = rows.first() else {
        return empty_table(title, "No rows");
    };

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(first.keys().map(|k| Cell::from(k.to_owned()))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(
                std::iter::once(Cell::from(row.label.clone()))
                    .chain(row.values.iter().map(|(_, v)| Cell::from(v.to_string()))),
            )
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain(first.values.iter().map(|_| Constraint::Length(VALUE_WIDTH)));

    Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(default_border(Color::White).title(format!(" {title} ")))
}

fn empty_table<'a>(title: &str, message: &'a str) -> Table<'a> {
    Table::new(
        [Row::new([Cell::from(message)]).style(Style::default().fg(Color::DarkGray))],
        [Constraint::Fill(1)],
    )
    .block(default_border(Color::White).title(format!(" {title} ")))
}
