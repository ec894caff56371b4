use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};

use crate::{constants::DAYS_PER_WEEK, storage::KeyValueStore};

use super::App;

impl<B: KeyValueStore> App<B> {
    /// Returns true when the app should exit.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.in_day_modal() {
            self.handle_modal_key(key);
            false
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_day_modal(),
            KeyCode::Up | KeyCode::Char('k') => self.modal_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.modal_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_modal_exercise(),
            KeyCode::Char('r') => self.reset_selected_day(),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        let week = DAYS_PER_WEEK as i64;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-week),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(week),
            KeyCode::Char('[') | KeyCode::Char('p') | KeyCode::PageUp => self.shift_month(false),
            KeyCode::Char(']') | KeyCode::Char('n') | KeyCode::PageDown => self.shift_month(true),
            KeyCode::Char('t') => self.jump_to(Local::now().date_naive()),
            KeyCode::Enter => self.open_day_modal(),
            KeyCode::Char('r') => self.reset_selected_day(),
            KeyCode::F(5) => self.reload(),
            _ => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::{storage::MemoryStore, store::ScheduleStore};

    fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App<MemoryStore> {
        let (store, report) = ScheduleStore::open(MemoryStore::default());
        App::new(store, &report, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_arrows_move_by_day_and_week() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, NaiveDate::from_ymd_opt(2024, 3, 23).unwrap());
    }

    #[test]
    fn test_brackets_change_month() {
        let mut app = app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.view_month(), (2024, 3));
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.view_month(), (2024, 1));
    }

    #[test]
    fn test_modal_swallows_quit_and_escape_closes_it() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.in_day_modal());
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(!app.in_day_modal());
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_space_in_modal_toggles_highlighted_exercise() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        // 2024-03-15 is a Friday ["run"]; the first row is run.
        press(&mut app, KeyCode::Char(' '));
        let (ids, _) = app.selected_schedule();
        assert_eq!(ids, vec![crate::domain::ExerciseId::rest()]);
    }
}
