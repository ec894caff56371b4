//! Which exercises apply to a date.
//!
//! An override for the date wins outright; otherwise the weekly schedule for
//! the date's weekday applies. The two are never merged.

use chrono::{Datelike, NaiveDate};

use crate::{
    calendar::date_key,
    domain::{ExerciseId, Snapshot},
    error::SaveError,
    storage::KeyValueStore,
    store::ScheduleStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleSource {
    Override,
    Weekly,
}

pub fn effective_exercises(snapshot: &Snapshot, date: NaiveDate) -> Vec<ExerciseId> {
    resolve(snapshot, date).0
}

pub fn resolve(snapshot: &Snapshot, date: NaiveDate) -> (Vec<ExerciseId>, ScheduleSource) {
    if let Some(ids) = snapshot
        .overrides
        .get(&date_key(date))
        .filter(|ids| !ids.is_empty())
    {
        return (ids.clone(), ScheduleSource::Override);
    }

    let weekday = date.weekday().num_days_from_sunday() as usize;
    (
        snapshot.weekly_schedule.day(weekday).to_vec(),
        ScheduleSource::Weekly,
    )
}

/// The override a toggle would leave behind, or `None` when the key should
/// be deleted. Starts from the date's current effective list.
pub fn toggled_override(
    snapshot: &Snapshot,
    date: NaiveDate,
    exercise_id: &ExerciseId,
    enabled: bool,
) -> Option<Vec<ExerciseId>> {
    let mut ids = effective_exercises(snapshot, date);
    if enabled {
        if !ids.contains(exercise_id) {
            ids.push(exercise_id.clone());
        }
    } else {
        ids.retain(|id| id != exercise_id);
    }

    if ids.is_empty() {
        snapshot.rest_exercise().map(|rest| vec![rest.id.clone()])
    } else {
        Some(ids)
    }
}

/// Writes the toggled list as the date's override and returns it. Returns an
/// empty list when the override was deleted because no rest exercise exists.
pub fn toggle_exercise_on_date<B: KeyValueStore>(
    store: &mut ScheduleStore<B>,
    date: NaiveDate,
    exercise_id: &ExerciseId,
    enabled: bool,
) -> Result<Vec<ExerciseId>, SaveError> {
    let key = date_key(date);
    let next = toggled_override(store.snapshot(), date, exercise_id, enabled);
    log::debug!("toggle {} on {} -> {:?}", exercise_id, key, next);

    store.update(|snapshot| match next {
        Some(ids) => {
            snapshot.overrides.insert(key, ids.clone());
            ids
        }
        None => {
            snapshot.overrides.remove(&key);
            Vec::new()
        }
    })
}

/// Drops the date's override. Returns whether one existed.
pub fn reset_date_to_weekly<B: KeyValueStore>(
    store: &mut ScheduleStore<B>,
    date: NaiveDate,
) -> Result<bool, SaveError> {
    let key = date_key(date);
    store.update(|snapshot| snapshot.overrides.remove(&key).is_some())
}

/// Removes `exercise_id` from every weekday's list. Overrides that mention it
/// are left as they are.
pub fn remove_exercise_everywhere<B: KeyValueStore>(
    store: &mut ScheduleStore<B>,
    exercise_id: &ExerciseId,
) -> Result<usize, SaveError> {
    store.update(|snapshot| snapshot.weekly_schedule.purge(exercise_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Exercise, storage::MemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(list: &[&str]) -> Vec<ExerciseId> {
        list.iter().map(|id| ExerciseId::new(*id)).collect()
    }

    fn open_store() -> ScheduleStore<MemoryStore> {
        ScheduleStore::open(MemoryStore::default()).0
    }

    #[test]
    fn test_override_takes_precedence_over_weekly() {
        let mut snapshot = Snapshot::default();
        // 2024-01-03 is a Wednesday (bike in the weekly plan).
        snapshot
            .overrides
            .insert("2024-01-03".into(), ids(&["swim", "run"]));

        let (resolved, source) = resolve(&snapshot, date(2024, 1, 3));
        assert_eq!(resolved, ids(&["swim", "run"]));
        assert_eq!(source, ScheduleSource::Override);
    }

    #[test]
    fn test_weekly_fallback_without_override() {
        let snapshot = Snapshot::default();
        assert_eq!(effective_exercises(&snapshot, date(2024, 1, 3)), ids(&["bike"]));
        assert_eq!(effective_exercises(&snapshot, date(2024, 1, 4)), ids(&["rest"]));
        assert_eq!(
            resolve(&snapshot, date(2024, 1, 4)).1,
            ScheduleSource::Weekly
        );
    }

    #[test]
    fn test_empty_override_falls_back_to_weekly() {
        let mut snapshot = Snapshot::default();
        snapshot.overrides.insert("2024-01-03".into(), Vec::new());
        assert_eq!(effective_exercises(&snapshot, date(2024, 1, 3)), ids(&["bike"]));
    }

    #[test]
    fn test_missing_weekday_yields_empty() {
        let mut snapshot = Snapshot::default();
        snapshot.weekly_schedule.set_day(3, Vec::new());
        assert!(effective_exercises(&snapshot, date(2024, 1, 3)).is_empty());
    }

    #[test]
    fn test_toggle_on_adds_to_resolved_list_without_touching_weekly() {
        let mut store = open_store();
        let result =
            toggle_exercise_on_date(&mut store, date(2024, 1, 3), &"swim".into(), true).unwrap();

        assert_eq!(result, ids(&["bike", "swim"]));
        assert_eq!(store.snapshot().overrides.get("2024-01-03"), Some(&result));
        assert_eq!(store.snapshot().weekly_schedule.day(3), ids(&["bike"]).as_slice());
        assert!(store.backend().values["overrides"].contains("2024-01-03"));
    }

    #[test]
    fn test_toggle_on_twice_does_not_duplicate() {
        let mut store = open_store();
        let day = date(2024, 1, 3);
        toggle_exercise_on_date(&mut store, day, &"bike".into(), true).unwrap();
        let result = toggle_exercise_on_date(&mut store, day, &"bike".into(), true).unwrap();
        assert_eq!(result, ids(&["bike"]));
    }

    #[test]
    fn test_toggling_off_last_exercise_becomes_rest() {
        let mut store = open_store();
        let result =
            toggle_exercise_on_date(&mut store, date(2024, 1, 3), &"bike".into(), false).unwrap();

        assert_eq!(result, ids(&["rest"]));
        assert_eq!(store.snapshot().overrides.get("2024-01-03"), Some(&ids(&["rest"])));
    }

    #[test]
    fn test_toggling_off_last_without_rest_deletes_override() {
        let mut store = open_store();
        store
            .update(|s| {
                s.exercises.retain(|e: &Exercise| !e.id.is_rest());
                s.overrides.insert("2024-01-03".into(), ids(&["swim"]));
            })
            .unwrap();

        let result =
            toggle_exercise_on_date(&mut store, date(2024, 1, 3), &"swim".into(), false).unwrap();

        assert!(result.is_empty());
        assert!(!store.snapshot().overrides.contains_key("2024-01-03"));
        assert_eq!(
            effective_exercises(store.snapshot(), date(2024, 1, 3)),
            ids(&["bike"])
        );
    }

    #[test]
    fn test_toggle_off_from_existing_override() {
        let mut store = open_store();
        let day = date(2024, 1, 3);
        store
            .update(|s| s.overrides.insert("2024-01-03".into(), ids(&["swim", "run"])))
            .unwrap();

        let result = toggle_exercise_on_date(&mut store, day, &"swim".into(), false).unwrap();
        assert_eq!(result, ids(&["run"]));
    }

    #[test]
    fn test_reset_date_to_weekly() {
        let mut store = open_store();
        let day = date(2024, 1, 3);
        toggle_exercise_on_date(&mut store, day, &"swim".into(), true).unwrap();

        assert!(reset_date_to_weekly(&mut store, day).unwrap());
        assert!(!reset_date_to_weekly(&mut store, day).unwrap());
        assert_eq!(effective_exercises(store.snapshot(), day), ids(&["bike"]));
        assert!(!store.backend().values["overrides"].contains("2024-01-03"));
    }

    #[test]
    fn test_remove_everywhere_leaves_overrides_dangling() {
        let mut store = open_store();
        store
            .update(|s| s.overrides.insert("2023-12-27".into(), ids(&["bike", "swim"])))
            .unwrap();

        let removed = remove_exercise_everywhere(&mut store, &"bike".into()).unwrap();

        assert_eq!(removed, 1);
        assert!(store.snapshot().weekly_schedule.day(3).is_empty());
        assert_eq!(
            store.snapshot().overrides.get("2023-12-27"),
            Some(&ids(&["bike", "swim"]))
        );
        assert_eq!(
            effective_exercises(store.snapshot(), date(2023, 12, 27)),
            ids(&["bike", "swim"])
        );
    }

    #[test]
    fn test_toggle_reports_save_failure() {
        let mut store = ScheduleStore::open(MemoryStore {
            failing: vec!["overrides".to_string()],
            ..MemoryStore::default()
        })
        .0;
        let err = toggle_exercise_on_date(&mut store, date(2024, 1, 3), &"swim".into(), true)
            .unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].key(), "overrides");
    }
}
