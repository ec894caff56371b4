use std::{io, time::Duration};

use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::{
    constants::TIME_SETTINGS,
    storage::{JsonDirStore, KeyValueStore},
    store::{DefaultReason, LoadReport, LoadStatus, ScheduleStore},
};

mod day_modal_view;
mod day_state;
mod event_handlers;
mod render_views;
mod ui_helpers;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    Main,
    DayModal,
}

struct App<B: KeyValueStore> {
    store: ScheduleStore<B>,
    ui_mode: UiMode,
    selected: NaiveDate,
    modal_index: usize,
    status: Option<String>,
    render_needed: bool,
}

impl<B: KeyValueStore> App<B> {
    fn new(store: ScheduleStore<B>, report: &LoadReport, today: NaiveDate) -> Self {
        Self {
            store,
            ui_mode: UiMode::Main,
            selected: today,
            modal_index: 0,
            status: load_status_message(report),
            render_needed: true,
        }
    }

    fn open_day_modal(&mut self) {
        self.ui_mode = UiMode::DayModal;
        self.modal_index = 0;
        self.render_needed = true;
    }

    fn close_day_modal(&mut self) {
        self.ui_mode = UiMode::Main;
        self.render_needed = true;
    }

    fn in_day_modal(&self) -> bool {
        matches!(self.ui_mode, UiMode::DayModal)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.render_needed = true;
    }

    fn modal_rect(&self, terminal_size: Rect) -> Rect {
        let target_width = terminal_size.width / 2;
        let target_height = (self.store.snapshot().exercises.len() as u16 + 4).max(8);

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }
}

/// A one-line notice for keys that had to be repaired or replaced by
/// defaults. Keys that were simply absent are not worth mentioning.
fn load_status_message(report: &LoadReport) -> Option<String> {
    let recovered: Vec<&str> = report
        .entries()
        .into_iter()
        .filter(|(_, status)| {
            !matches!(
                status,
                LoadStatus::Loaded | LoadStatus::Defaulted(DefaultReason::Missing)
            )
        })
        .map(|(key, _)| key)
        .collect();

    if recovered.is_empty() {
        None
    } else {
        Some(format!("Recovered from bad data in: {}", recovered.join(", ")))
    }
}

pub fn run_ui() -> Result<(), io::Error> {
    let backend = JsonDirStore::open_default();
    log::info!("using data dir {}", backend.dir().display());
    let (store, report) = ScheduleStore::open(backend);
    for (key, status) in report.entries() {
        if !status.is_loaded() {
            log::warn!("{}: {}", key, status);
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, &report, Local::now().date_naive());
    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);

    loop {
        if app.render_needed {
            terminal.draw(|f| {
                app.draw_frame(f);
            })?;
            app.render_needed = false;
        }

        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::Resize(_, _) => app.render_needed = true,
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
