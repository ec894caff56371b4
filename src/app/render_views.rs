use chrono::{Local, NaiveDate};
use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    calendar::{self, DayCell, DayTiming},
    constants::{DAYS_PER_WEEK, GRID_CELLS, WEEKDAY_NAMES},
    resolver::{self, ScheduleSource},
    storage::KeyValueStore,
    styling,
};

use super::{App, view_style};

const HELP_TEXT: &str =
    "arrows move  [ ] month  t today  Enter edit day  r reset day  F5 reload  q quit";

impl<B: KeyValueStore> App<B> {
    pub(super) fn draw_frame(&self, f: &mut Frame) {
        let size = f.size();
        // Sampled once per draw; cells are not reclassified until the next one.
        let today = Local::now().date_naive();
        let (year, month) = self.view_month();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    format!("{} {}", calendar::month_name(month), year),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Left),
            )
            .title(
                Line::from(Span::styled(
                    today.format("%a %b %-d, %Y").to_string(),
                    Style::default().fg(Color::White),
                ))
                .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(size);
        f.render_widget(block, size);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_weekday_header(f, sections[0]);
        let grid = calendar::build_month_grid(year, month);
        self.render_grid(f, sections[1], &grid, today);
        self.render_selection_line(f, sections[2], &grid);
        f.render_widget(
            Paragraph::new(Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray))),
            sections[3],
        );

        if self.in_day_modal() {
            self.render_day_modal(f, size);
        }
    }

    fn render_weekday_header(&self, f: &mut Frame, area: Rect) {
        for (name, column) in WEEKDAY_NAMES.iter().zip(week_columns(area).iter()) {
            let label = Paragraph::new(Span::styled(
                name.chars().take(3).collect::<String>(),
                Style::default().fg(Color::Gray),
            ))
            .alignment(Alignment::Center);
            f.render_widget(label, *column);
        }
    }

    fn render_grid(&self, f: &mut Frame, area: Rect, grid: &[DayCell; GRID_CELLS], today: NaiveDate) {
        let selected_index = calendar::grid_index_of(self.selected);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 6); GRID_CELLS / DAYS_PER_WEEK])
            .split(area);

        for (row, (row_area, week)) in rows.iter().zip(calendar::grid_rows(grid)).enumerate() {
            for (col, (cell_area, cell)) in week_columns(*row_area).iter().zip(week).enumerate() {
                let index = row * DAYS_PER_WEEK + col;
                self.render_day_cell(f, *cell_area, cell, today, index == selected_index);
            }
        }
    }

    fn render_day_cell(
        &self,
        f: &mut Frame,
        area: Rect,
        cell: &DayCell,
        today: NaiveDate,
        selected: bool,
    ) {
        let snapshot = self.store.snapshot();
        let timing = DayTiming::classify(cell, today);
        let exercises = cell
            .date()
            .map(|date| resolver::effective_exercises(snapshot, date))
            .unwrap_or_default();
        let active = styling::is_active(&exercises, timing.is_past);
        let background = styling::background_tint(
            &exercises,
            timing.is_past,
            &snapshot.tint_by_exercise_id,
        )
        .and_then(|css| view_style::tint_to_color(&css));

        let mut day_style = view_style::day_number_style(timing, active);
        let bordered = area.height >= 4;
        if selected && !bordered {
            day_style = day_style.add_modifier(Modifier::REVERSED);
        }

        let icon_style = if timing.is_overflow {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{:>2}", cell.day), day_style),
                if active {
                    Span::styled(" ✓", Style::default().fg(Color::Green))
                } else {
                    Span::raw("")
                },
            ]),
            Line::from(Span::styled(
                snapshot.icons_for(&exercises).concat(),
                icon_style,
            )),
        ];

        let mut paragraph = Paragraph::new(lines);
        if bordered {
            paragraph = paragraph.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(if selected {
                        BorderType::Thick
                    } else {
                        BorderType::Rounded
                    })
                    .border_style(
                        Style::default().fg(view_style::cell_border_color(selected, timing)),
                    ),
            );
        }
        if let Some(bg) = background {
            paragraph =
                paragraph.style(Style::default().bg(bg).fg(view_style::text_color_for_bg(bg)));
        }
        f.render_widget(paragraph, area);
    }

    fn render_selection_line(&self, f: &mut Frame, area: Rect, grid: &[DayCell; GRID_CELLS]) {
        let cell = grid[calendar::grid_index_of(self.selected)];
        let (_, source) = self.selected_schedule();
        let source_label = match source {
            ScheduleSource::Override => "edited",
            ScheduleSource::Weekly => "weekly",
        };

        let mut spans = vec![
            Span::styled(
                cell.key(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", source_label),
                Style::default().fg(Color::Gray),
            ),
        ];
        if let Some(status) = &self.status {
            spans.push(Span::styled(
                format!("  {}", status),
                Style::default().fg(Color::Yellow),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn week_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, DAYS_PER_WEEK as u32); DAYS_PER_WEEK])
        .split(area)
}
