use crate::draw::default_border;
use savant_api::{Base, BaseRunner, Count, Defender};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget, Wrap};

pub fn runner_on(runners: &[BaseRunner], base: Base) -> Option<&str> {
    runners.iter().find(|r| r.base == base).map(|r| r.name.as_str())
}

fn base_span(runners: &[BaseRunner], base: Base, label: &str) -> Vec<Span<'static>> {
    match runner_on(runners, base) {
        Some(name) => vec![
            Span::styled("◆ ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{label} {name}")),
        ],
        None => vec![
            Span::styled("◇ ", Style::default().fg(Color::DarkGray)),
            Span::styled(label.to_owned(), Style::default().fg(Color::DarkGray)),
        ],
    }
}

pub fn count_line(count: Count) -> Line<'static> {
    Line::from(vec![
        Span::styled("B ", Style::default().fg(Color::Green)),
        Span::raw(count.balls.to_string()),
        Span::styled("  S ", Style::default().fg(Color::Red)),
        Span::raw(count.strikes.to_string()),
        Span::styled("  O ", Style::default().fg(Color::Yellow)),
        Span::raw(count.outs.to_string()),
    ])
}

/// Matchup, count, base runners and the defensive alignment.
pub struct FieldPanel<'a> {
    pub batter: Option<&'a str>,
    pub pitcher: Option<&'a str>,
    pub count: Count,
    pub runners: &'a [BaseRunner],
    pub defenders: &'a [Defender],
}

impl FieldPanel<'_> {
    pub fn lines(&self) -> Vec<Line<'static>> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(vec![
                Span::styled("AB  ", bold),
                Span::raw(self.batter.unwrap_or("-").to_owned()),
            ]),
            Line::from(vec![
                Span::styled("P   ", bold),
                Span::raw(self.pitcher.unwrap_or("-").to_owned()),
            ]),
            count_line(self.count),
            Line::default(),
            Line::from(base_span(self.runners, Base::Second, "2B")).centered(),
            Line::from(
                [
                    base_span(self.runners, Base::Third, "3B"),
                    vec![Span::raw("    ")],
                    base_span(self.runners, Base::First, "1B"),
                ]
                .concat(),
            )
            .centered(),
            Line::default(),
        ];

        if self.defenders.is_empty() {
            lines.push(Line::styled("No defensive alignment", Style::default().fg(Color::DarkGray)));
        } else {
            lines.push(Line::styled("Defense", bold));
            lines.extend(self.defenders.iter().map(|d| {
                Line::from(vec![
                    Span::styled(format!("{:<3}", d.position.abbrev()), Style::default().fg(Color::Cyan)),
                    Span::raw(d.name.clone()),
                ])
            }));
        }
        lines
    }
}

impl Widget for FieldPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: true })
            .block(default_border(Color::White).title(" Field "))
            .render(area, buf);
    }
}
