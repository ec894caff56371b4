//! Owns the persisted snapshot.
//!
//! Each of the five keys is decoded on its own into a typed record. A key
//! that is absent or unusable falls back to its default and the fallback is
//! reported through [`LoadReport`] instead of failing the load. Saving always
//! attempts every key and reports the ones that failed.

use std::{collections::BTreeMap, fmt};

use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    calendar::{day_key, parse_day_key},
    constants::{DAYS_PER_WEEK, EXERCISE_LIMITS, STORE_KEYS},
    domain::{
        Exercise, ExerciseId, Overrides, Snapshot, TintByExerciseId, TintColors, TintKey,
        WeeklySchedule,
    },
    error::{SaveError, ScheduleError, StoreError},
    storage::KeyValueStore,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultReason {
    Missing,
    Unreadable(String),
    Malformed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// The value had the right shape but some entries were discarded.
    Repaired { dropped: usize },
    Defaulted(DefaultReason),
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Loaded => write!(f, "loaded"),
            LoadStatus::Repaired { dropped } => {
                write!(f, "repaired, {} entries dropped", dropped)
            }
            LoadStatus::Defaulted(DefaultReason::Missing) => write!(f, "missing, using defaults"),
            LoadStatus::Defaulted(DefaultReason::Unreadable(reason)) => {
                write!(f, "unreadable ({}), using defaults", reason)
            }
            LoadStatus::Defaulted(DefaultReason::Malformed(reason)) => {
                write!(f, "malformed ({}), using defaults", reason)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub exercises: LoadStatus,
    pub weekly_schedule: LoadStatus,
    pub overrides: LoadStatus,
    pub tint_colors: LoadStatus,
    pub tint_by_exercise_id: LoadStatus,
}

impl LoadReport {
    pub fn entries(&self) -> [(&'static str, &LoadStatus); 5] {
        [
            (STORE_KEYS.exercises, &self.exercises),
            (STORE_KEYS.weekly_schedule, &self.weekly_schedule),
            (STORE_KEYS.overrides, &self.overrides),
            (STORE_KEYS.tint_colors, &self.tint_colors),
            (STORE_KEYS.tint_by_exercise_id, &self.tint_by_exercise_id),
        ]
    }

    pub fn is_clean(&self) -> bool {
        self.entries().iter().all(|(_, status)| status.is_loaded())
    }
}

pub struct Loaded {
    pub snapshot: Snapshot,
    pub report: LoadReport,
}

type Decoded<T> = Result<(T, usize), String>;

pub fn load<B: KeyValueStore>(backend: &B) -> Loaded {
    let (exercises, exercises_status) = load_key(
        backend,
        STORE_KEYS.exercises,
        Exercise::defaults,
        decode_exercises,
    );
    let (weekly_schedule, weekly_status) = load_key(
        backend,
        STORE_KEYS.weekly_schedule,
        WeeklySchedule::defaults,
        decode_weekly,
    );
    let (overrides, overrides_status) = load_key(
        backend,
        STORE_KEYS.overrides,
        Overrides::new,
        decode_overrides,
    );
    let (tint_colors, tint_colors_status) = load_key(
        backend,
        STORE_KEYS.tint_colors,
        TintColors::default,
        decode_tint_colors,
    );
    let (tint_by_exercise_id, tint_by_id_status) = load_key(
        backend,
        STORE_KEYS.tint_by_exercise_id,
        TintByExerciseId::new,
        decode_tint_by_exercise_id,
    );

    Loaded {
        snapshot: Snapshot {
            exercises,
            weekly_schedule,
            overrides,
            tint_colors,
            tint_by_exercise_id,
        },
        report: LoadReport {
            exercises: exercises_status,
            weekly_schedule: weekly_status,
            overrides: overrides_status,
            tint_colors: tint_colors_status,
            tint_by_exercise_id: tint_by_id_status,
        },
    }
}

fn load_key<B, T>(
    backend: &B,
    key: &str,
    default: impl FnOnce() -> T,
    decode: impl FnOnce(Value) -> Decoded<T>,
) -> (T, LoadStatus)
where
    B: KeyValueStore,
{
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (default(), LoadStatus::Defaulted(DefaultReason::Missing)),
        Err(e) => {
            log::warn!("{}; using defaults", e);
            return (
                default(),
                LoadStatus::Defaulted(DefaultReason::Unreadable(e.to_string())),
            );
        }
    };

    let decoded = serde_json::from_str::<Value>(&raw)
        .map_err(|e| e.to_string())
        .and_then(decode);

    match decoded {
        Ok((value, 0)) => (value, LoadStatus::Loaded),
        Ok((value, dropped)) => {
            log::warn!("dropped {} malformed entries from `{}`", dropped, key);
            (value, LoadStatus::Repaired { dropped })
        }
        Err(reason) => {
            log::warn!("`{}` is malformed ({}); using defaults", key, reason);
            (
                default(),
                LoadStatus::Defaulted(DefaultReason::Malformed(reason)),
            )
        }
    }
}

fn expect_object(value: Value) -> Result<Map<String, Value>, String> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected an object, found {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Keeps the string elements of an array; returns `None` if `value` is not an array.
fn id_list(value: Value) -> Option<(Vec<ExerciseId>, usize)> {
    let Value::Array(items) = value else {
        return None;
    };

    let mut dropped = 0;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(id) => ids.push(ExerciseId(id)),
            _ => dropped += 1,
        }
    }
    Some((ids, dropped))
}

fn decode_exercises(value: Value) -> Decoded<Vec<Exercise>> {
    let Value::Array(items) = value else {
        return Err(format!("expected an array, found {}", json_kind(&value)));
    };

    let mut dropped = 0;
    let mut exercises: Vec<Exercise> = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Exercise>(item) {
            Ok(exercise) if !exercises.iter().any(|e| e.id == exercise.id) => {
                exercises.push(exercise)
            }
            _ => dropped += 1,
        }
    }
    Ok((exercises, dropped))
}

fn decode_weekly(value: Value) -> Decoded<WeeklySchedule> {
    let map = expect_object(value)?;

    let mut dropped = 0;
    let mut schedule = WeeklySchedule::default();
    for (key, day) in map {
        let weekday = key.trim().parse::<usize>().ok().filter(|d| *d < DAYS_PER_WEEK);
        match (weekday, id_list(day)) {
            (Some(weekday), Some((ids, bad))) => {
                schedule.set_day(weekday, ids);
                dropped += bad;
            }
            _ => dropped += 1,
        }
    }
    Ok((schedule, dropped))
}

fn decode_overrides(value: Value) -> Decoded<Overrides> {
    let map = expect_object(value)?;

    let mut dropped = 0;
    let mut overrides = Overrides::new();
    for (key, day) in map {
        let canonical = parse_day_key(&key).map(|(y, m, d)| day_key(y, m, d));
        match (canonical, id_list(day)) {
            (Some(canonical), Some((ids, bad))) if !ids.is_empty() => {
                overrides.insert(canonical, ids);
                dropped += bad;
            }
            _ => dropped += 1,
        }
    }
    Ok((overrides, dropped))
}

fn decode_tint_colors(value: Value) -> Decoded<TintColors> {
    let mut map = expect_object(value)?;

    let mut dropped = 0;
    let mut tints = TintColors::default();
    for key in TintKey::ALL {
        match map.remove(key.field_name()) {
            Some(Value::String(color)) => tints.set(key, color),
            _ => dropped += 1,
        }
    }
    Ok((tints, dropped))
}

fn decode_tint_by_exercise_id(value: Value) -> Decoded<TintByExerciseId> {
    let map = expect_object(value)?;

    let mut dropped = 0;
    let mut tints = TintByExerciseId::new();
    for (id, color) in map {
        match color {
            Value::String(color) => {
                tints.insert(ExerciseId(id), color);
            }
            _ => dropped += 1,
        }
    }
    Ok((tints, dropped))
}

/// Writes all five keys. A failing key does not stop the others.
pub fn save<B: KeyValueStore>(backend: &mut B, snapshot: &Snapshot) -> Result<(), SaveError> {
    let weekly: BTreeMap<String, &[ExerciseId]> = snapshot
        .weekly_schedule
        .days()
        .map(|(weekday, ids)| (weekday.to_string(), ids))
        .collect();

    let failures: Vec<StoreError> = [
        write_key(backend, STORE_KEYS.exercises, &snapshot.exercises),
        write_key(backend, STORE_KEYS.weekly_schedule, &weekly),
        write_key(backend, STORE_KEYS.overrides, &snapshot.overrides),
        write_key(backend, STORE_KEYS.tint_colors, &snapshot.tint_colors),
        write_key(
            backend,
            STORE_KEYS.tint_by_exercise_id,
            &snapshot.tint_by_exercise_id,
        ),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        for failure in &failures {
            log::error!("{}", failure);
        }
        Err(SaveError { failures })
    }
}

fn write_key<B, T>(backend: &mut B, key: &str, value: &T) -> Result<(), StoreError>
where
    B: KeyValueStore,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    backend.set(key, &json)
}

/// The single owner of the in-memory snapshot and its backend.
pub struct ScheduleStore<B: KeyValueStore> {
    backend: B,
    snapshot: Snapshot,
}

impl<B: KeyValueStore> ScheduleStore<B> {
    pub fn open(backend: B) -> (Self, LoadReport) {
        let Loaded { snapshot, report } = load(&backend);
        (Self { backend, snapshot }, report)
    }

    pub fn reload(&mut self) -> LoadReport {
        let Loaded { snapshot, report } = load(&self.backend);
        self.snapshot = snapshot;
        report
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn save(&mut self) -> Result<(), SaveError> {
        save(&mut self.backend, &self.snapshot)
    }

    /// Applies `mutate` and then saves the whole snapshot. The in-memory
    /// change is kept even if the save fails.
    pub fn update<T>(&mut self, mutate: impl FnOnce(&mut Snapshot) -> T) -> Result<T, SaveError> {
        let result = mutate(&mut self.snapshot);
        self.save()?;
        Ok(result)
    }

    fn require_exercise(&self, id: &ExerciseId) -> Result<(), ScheduleError> {
        if self.snapshot.has_exercise(id) {
            Ok(())
        } else {
            Err(ScheduleError::UnknownExercise(id.clone()))
        }
    }

    pub fn add_exercise(&mut self, name: &str, icon: &str) -> Result<ExerciseId, ScheduleError> {
        let id = generate_exercise_id(&self.snapshot.exercises);
        let name = non_blank(name, EXERCISE_LIMITS.placeholder_name);
        let icon = non_blank(&clip_icon(icon), EXERCISE_LIMITS.placeholder_icon);

        log::debug!("adding exercise {} ({})", id, name);
        let exercise = Exercise {
            id: id.clone(),
            name,
            icon,
        };
        self.update(|snapshot| snapshot.exercises.push(exercise))?;
        Ok(id)
    }

    pub fn rename_exercise(&mut self, id: &ExerciseId, name: &str) -> Result<(), ScheduleError> {
        self.require_exercise(id)?;
        let name = name.trim().to_string();
        self.update(|snapshot| {
            if let Some(exercise) = snapshot.exercise_mut(id) {
                exercise.name = name;
            }
        })?;
        Ok(())
    }

    pub fn set_exercise_icon(&mut self, id: &ExerciseId, icon: &str) -> Result<(), ScheduleError> {
        self.require_exercise(id)?;
        let icon = clip_icon(icon);
        self.update(|snapshot| {
            if let Some(exercise) = snapshot.exercise_mut(id) {
                exercise.icon = icon;
            }
        })?;
        Ok(())
    }

    /// Deletes an exercise and drops it from the weekly schedule. Overrides and
    /// per-exercise tints keep the id as inert data.
    pub fn remove_exercise(&mut self, id: &ExerciseId) -> Result<Exercise, ScheduleError> {
        let Some(index) = self.snapshot.exercises.iter().position(|e| &e.id == id) else {
            return Err(ScheduleError::UnknownExercise(id.clone()));
        };
        if self.snapshot.exercises.len() <= 1 {
            return Err(ScheduleError::LastExercise(id.clone()));
        }

        log::debug!("removing exercise {}", id);
        let removed = self.update(|snapshot| {
            let removed = snapshot.exercises.remove(index);
            snapshot.weekly_schedule.purge(id);
            removed
        })?;
        Ok(removed)
    }

    pub fn set_weekly_day(
        &mut self,
        weekday: usize,
        ids: Vec<ExerciseId>,
    ) -> Result<(), ScheduleError> {
        if weekday >= DAYS_PER_WEEK {
            return Err(ScheduleError::InvalidWeekday(weekday));
        }
        for id in &ids {
            self.require_exercise(id)?;
        }
        self.update(|snapshot| snapshot.weekly_schedule.set_day(weekday, ids))?;
        Ok(())
    }

    pub fn set_weekly_exercise(
        &mut self,
        weekday: usize,
        id: &ExerciseId,
        enabled: bool,
    ) -> Result<(), ScheduleError> {
        if weekday >= DAYS_PER_WEEK {
            return Err(ScheduleError::InvalidWeekday(weekday));
        }
        self.require_exercise(id)?;
        self.update(|snapshot| snapshot.weekly_schedule.set_exercise(weekday, id, enabled))?;
        Ok(())
    }

    pub fn set_exercise_tint(&mut self, id: &ExerciseId, color: &str) -> Result<(), ScheduleError> {
        self.require_exercise(id)?;
        let color = color.trim().to_string();
        self.update(|snapshot| snapshot.tint_by_exercise_id.insert(id.clone(), color))?;
        Ok(())
    }

    /// Returns whether a tint was configured.
    pub fn clear_exercise_tint(&mut self, id: &ExerciseId) -> Result<bool, ScheduleError> {
        let removed = self.update(|snapshot| snapshot.tint_by_exercise_id.remove(id).is_some())?;
        Ok(removed)
    }

    pub fn set_tint_color(&mut self, key: TintKey, value: &str) -> Result<(), ScheduleError> {
        let value = value.trim().to_string();
        self.update(|snapshot| snapshot.tint_colors.set(key, value))?;
        Ok(())
    }
}

fn non_blank(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

fn clip_icon(icon: &str) -> String {
    icon.trim().chars().take(EXERCISE_LIMITS.icon_chars).collect()
}

fn generate_exercise_id(existing: &[Exercise]) -> ExerciseId {
    let mut rng = rand::thread_rng();
    loop {
        let suffix: String = (0..EXERCISE_LIMITS.generated_id_chars)
            .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
            .collect();
        let id = ExerciseId(format!("ex{}", suffix));
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
    }
}
