use rps_api::Hand;
use rps_api::stats::PlayerStats;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

/// Summary block for a looked-up player, or the not-found notice.
pub struct StatsCard<'a> {
    pub query: &'a str,
    pub stats: Option<&'a PlayerStats>,
}

impl Widget for StatsCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(stats) = self.stats else {
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Player not found",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("No games recorded for \"{}\" yet.", self.query),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .render(area, buf);
            return;
        };

        let most_played = stats.most_played.map_or("-", |h| h.label());
        let lines = vec![
            field("Name", stats.name.clone()),
            field("Total Games", stats.total_games.to_string()),
            field("Wins", stats.wins.to_string()),
            field("Win Ratio", format!("{} %", stats.win_percentage)),
            field("Most Played Hand", most_played.to_string()),
            hand_breakdown(stats),
        ];
        Paragraph::new(lines).render(area, buf);
    }
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ])
}

fn hand_breakdown(stats: &PlayerStats) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("{:<18}", "Hands"), Style::default().fg(Color::Gray))];
    for hand in Hand::ALL {
        let style = if stats.most_played == Some(hand) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("{} {}  ", hand.label(), stats.hand_counts.get(hand)),
            style,
        ));
    }
    Line::from(spans)
}
