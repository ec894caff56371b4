use chrono::{Datelike, NaiveDate};

use crate::{
    domain::ExerciseId,
    resolver::{self, ScheduleSource},
    storage::KeyValueStore,
};

use super::{App, ui_helpers};

impl<B: KeyValueStore> App<B> {
    /// `(year, 0-based month)` of the grid being shown.
    pub(super) fn view_month(&self) -> (i32, u32) {
        (self.selected.year(), self.selected.month0())
    }

    pub(super) fn move_selection(&mut self, delta: i64) {
        self.selected = ui_helpers::step_days(self.selected, delta);
        self.render_needed = true;
    }

    pub(super) fn shift_month(&mut self, forward: bool) {
        self.selected = ui_helpers::step_month(self.selected, forward);
        self.render_needed = true;
    }

    pub(super) fn jump_to(&mut self, date: NaiveDate) {
        self.selected = date;
        self.render_needed = true;
    }

    pub(super) fn selected_schedule(&self) -> (Vec<ExerciseId>, ScheduleSource) {
        resolver::resolve(self.store.snapshot(), self.selected)
    }

    pub(super) fn modal_prev(&mut self) {
        let len = self.store.snapshot().exercises.len();
        self.modal_index = ui_helpers::wrap_prev_index(self.modal_index, len);
        self.render_needed = true;
    }

    pub(super) fn modal_next(&mut self) {
        let len = self.store.snapshot().exercises.len();
        self.modal_index = ui_helpers::wrap_next_index(self.modal_index, len);
        self.render_needed = true;
    }

    /// Flips the highlighted exercise on the selected date.
    pub(super) fn toggle_modal_exercise(&mut self) {
        let Some(exercise_id) = self
            .store
            .snapshot()
            .exercises
            .get(self.modal_index)
            .map(|exercise| exercise.id.clone())
        else {
            return;
        };

        let (current, _) = self.selected_schedule();
        let enabled = !current.contains(&exercise_id);
        match resolver::toggle_exercise_on_date(&mut self.store, self.selected, &exercise_id, enabled)
        {
            Ok(_) => self.status = None,
            Err(e) => {
                log::error!("{}", e);
                self.set_status(format!("Not saved: {}", e));
            }
        }
        self.render_needed = true;
    }

    pub(super) fn reset_selected_day(&mut self) {
        match resolver::reset_date_to_weekly(&mut self.store, self.selected) {
            Ok(true) => self.set_status("Back to the weekly schedule"),
            Ok(false) => self.set_status("Already following the weekly schedule"),
            Err(e) => {
                log::error!("{}", e);
                self.set_status(format!("Not saved: {}", e));
            }
        }
    }

    /// Re-reads every key, picking up edits made from the command line.
    pub(super) fn reload(&mut self) {
        let report = self.store.reload();
        let len = self.store.snapshot().exercises.len();
        if self.modal_index >= len {
            self.modal_index = len.saturating_sub(1);
        }
        let message = super::load_status_message(&report).unwrap_or_else(|| "Reloaded".to_string());
        self.set_status(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::MemoryStore, store::ScheduleStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_on(day: NaiveDate) -> App<MemoryStore> {
        let (store, report) = ScheduleStore::open(MemoryStore::default());
        App::new(store, &report, day)
    }

    fn modal_index_of(app: &App<MemoryStore>, id: &str) -> usize {
        app.store
            .snapshot()
            .exercises
            .iter()
            .position(|e| e.id.as_str() == id)
            .unwrap()
    }

    #[test]
    fn test_selection_moves_into_next_month() {
        let mut app = app_on(date(2024, 1, 30));
        app.move_selection(7);
        assert_eq!(app.selected, date(2024, 2, 6));
        assert_eq!(app.view_month(), (2024, 1));
    }

    #[test]
    fn test_toggle_adds_exercise_as_override() {
        // 2024-01-05 is a Friday: ["run"] by default.
        let mut app = app_on(date(2024, 1, 5));
        app.modal_index = modal_index_of(&app, "swim");
        app.toggle_modal_exercise();

        let (ids, source) = app.selected_schedule();
        assert_eq!(source, ScheduleSource::Override);
        assert_eq!(ids, vec![ExerciseId::new("run"), ExerciseId::new("swim")]);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_toggling_last_exercise_leaves_rest() {
        let mut app = app_on(date(2024, 1, 5));
        app.modal_index = modal_index_of(&app, "run");
        app.toggle_modal_exercise();
        let (ids, _) = app.selected_schedule();
        assert_eq!(ids, vec![ExerciseId::rest()]);
    }

    #[test]
    fn test_reset_reports_whether_override_existed() {
        // Wednesday's default is ["bike"].
        let mut app = app_on(date(2024, 1, 3));
        app.reset_selected_day();
        assert_eq!(
            app.status.as_deref(),
            Some("Already following the weekly schedule")
        );

        app.modal_index = modal_index_of(&app, "bike");
        app.toggle_modal_exercise();
        app.reset_selected_day();
        assert_eq!(app.status.as_deref(), Some("Back to the weekly schedule"));
        assert_eq!(app.selected_schedule().1, ScheduleSource::Weekly);
    }

    #[test]
    fn test_failed_save_is_shown() {
        let backend = MemoryStore {
            failing: vec!["overrides".to_string()],
            ..MemoryStore::default()
        };
        let (store, report) = ScheduleStore::open(backend);
        // Turning off Friday's only exercise writes a [rest] override.
        let mut app = App::new(store, &report, date(2024, 1, 5));
        app.modal_index = modal_index_of(&app, "run");
        app.toggle_modal_exercise();
        assert!(app.status.as_deref().unwrap().starts_with("Not saved"));
    }

    #[test]
    fn test_modal_navigation_wraps() {
        let mut app = app_on(date(2024, 1, 3));
        app.modal_prev();
        assert_eq!(app.modal_index, app.store.snapshot().exercises.len() - 1);
        app.modal_next();
        assert_eq!(app.modal_index, 0);
    }
}
