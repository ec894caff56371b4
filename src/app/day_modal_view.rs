use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, ListState,
        block::{Position, Title},
    },
};

use crate::{color::parse_hex_rgb, resolver::ScheduleSource, storage::KeyValueStore};

use super::{App, view_style};

impl<B: KeyValueStore> App<B> {
    pub(super) fn render_day_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let modal_rect = self.modal_rect(terminal_size);
        let snapshot = self.store.snapshot();
        let (current, source) = self.selected_schedule();

        let items: Vec<ListItem> = snapshot
            .exercises
            .iter()
            .enumerate()
            .map(|(i, exercise)| {
                let checked = current.contains(&exercise.id);
                let tint = snapshot
                    .tint_by_exercise_id
                    .get(&exercise.id)
                    .and_then(|hex| parse_hex_rgb(hex))
                    .map(|(r, g, b)| Color::Rgb(r, g, b));
                let mark = if checked { "[x] " } else { "[ ] " };
                let line = Line::from(vec![
                    Span::raw(mark).fg(if checked { Color::Green } else { Color::Gray }),
                    Span::raw(format!("{} ", exercise.icon)),
                    Span::raw(exercise.name.as_str()),
                ]);

                if i == self.modal_index {
                    let bg = tint.unwrap_or(Color::White);
                    ListItem::new(line)
                        .style(Style::default().fg(view_style::text_color_for_bg(bg)).bg(bg))
                } else {
                    ListItem::new(line).style(Style::default().fg(Color::White))
                }
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.modal_index));

        let source_label = match source {
            ScheduleSource::Override => "edited",
            ScheduleSource::Weekly => "weekly",
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(
                        Line::from(vec![
                            Span::styled(
                                self.selected.format("%A, %B %-d").to_string(),
                                Style::default()
                                    .fg(Color::White)
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!(" ({})", source_label),
                                Style::default().fg(Color::Gray),
                            ),
                        ])
                        .alignment(Alignment::Center),
                    )
                    .title(
                        Title::from(Line::from(Span::styled(
                            "space toggle  r reset  esc close",
                            Style::default().fg(Color::DarkGray),
                        )))
                        .position(Position::Bottom)
                        .alignment(Alignment::Center),
                    )
                    .border_style(Style::default().fg(Color::White)),
            )
            .highlight_style(Style::default());

        f.render_widget(Clear, modal_rect);
        f.render_stateful_widget(list, modal_rect, &mut list_state);
    }
}
