use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_WEEK, DEFAULT_EXERCISES, DEFAULT_TINTS, DEFAULT_WEEKLY, REST_ID};

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub String);

impl ExerciseId {
    pub fn new(id: impl Into<String>) -> Self {
        ExerciseId(id.into())
    }

    pub fn rest() -> Self {
        ExerciseId::new(REST_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_rest(&self) -> bool {
        self.0 == REST_ID
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExerciseId {
    fn from(id: &str) -> Self {
        ExerciseId::new(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub icon: String,
}

impl Exercise {
    pub fn defaults() -> Vec<Exercise> {
        DEFAULT_EXERCISES
            .iter()
            .map(|d| Exercise {
                id: ExerciseId::new(d.id),
                name: d.name.to_string(),
                icon: d.icon.to_string(),
            })
            .collect()
    }
}

/// Weekday-indexed exercise lists. Index 0 is Sunday.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<ExerciseId>; DAYS_PER_WEEK],
}

impl WeeklySchedule {
    pub fn defaults() -> Self {
        let mut schedule = WeeklySchedule::default();
        for (weekday, ids) in DEFAULT_WEEKLY.iter().enumerate() {
            schedule.days[weekday] = ids.iter().map(|id| ExerciseId::new(*id)).collect();
        }
        schedule
    }

    pub fn day(&self, weekday: usize) -> &[ExerciseId] {
        self.days.get(weekday).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn days(&self) -> impl Iterator<Item = (usize, &[ExerciseId])> {
        self.days.iter().map(Vec::as_slice).enumerate()
    }

    /// Returns false when `weekday` is not 0..=6.
    pub fn set_day(&mut self, weekday: usize, ids: Vec<ExerciseId>) -> bool {
        let Some(day) = self.days.get_mut(weekday) else {
            return false;
        };
        let mut deduped: Vec<ExerciseId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        *day = deduped;
        true
    }

    pub fn set_exercise(&mut self, weekday: usize, id: &ExerciseId, enabled: bool) -> bool {
        let Some(day) = self.days.get_mut(weekday) else {
            return false;
        };
        if enabled {
            if !day.contains(id) {
                day.push(id.clone());
            }
        } else {
            day.retain(|existing| existing != id);
        }
        true
    }

    /// Removes `id` from every weekday and returns how many entries were dropped.
    pub fn purge(&mut self, id: &ExerciseId) -> usize {
        let mut removed = 0;
        for day in self.days.iter_mut() {
            let before = day.len();
            day.retain(|existing| existing != id);
            removed += before - day.len();
        }
        removed
    }
}

/// Per-date exercise lists keyed by `YYYY-MM-DD`. Values are never empty.
pub type Overrides = BTreeMap<String, Vec<ExerciseId>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TintKey {
    Swim,
    Gym,
    SwimGym,
}

impl TintKey {
    pub const ALL: [TintKey; 3] = [TintKey::Swim, TintKey::Gym, TintKey::SwimGym];

    pub fn field_name(self) -> &'static str {
        match self {
            TintKey::Swim => "swim",
            TintKey::Gym => "gym",
            TintKey::SwimGym => "swimGym",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TintColors {
    pub swim: String,
    pub gym: String,
    pub swim_gym: String,
}

impl TintColors {
    pub fn get(&self, key: TintKey) -> &str {
        match key {
            TintKey::Swim => &self.swim,
            TintKey::Gym => &self.gym,
            TintKey::SwimGym => &self.swim_gym,
        }
    }

    pub fn set(&mut self, key: TintKey, value: String) {
        match key {
            TintKey::Swim => self.swim = value,
            TintKey::Gym => self.gym = value,
            TintKey::SwimGym => self.swim_gym = value,
        }
    }

    pub fn default_for(key: TintKey) -> String {
        match key {
            TintKey::Swim => DEFAULT_TINTS.swim.to_string(),
            TintKey::Gym => DEFAULT_TINTS.gym.to_string(),
            TintKey::SwimGym => format!(
                "linear-gradient(135deg, {} 0%, {} 100%)",
                DEFAULT_TINTS.swim, DEFAULT_TINTS.gym
            ),
        }
    }
}

impl Default for TintColors {
    fn default() -> Self {
        Self {
            swim: TintColors::default_for(TintKey::Swim),
            gym: TintColors::default_for(TintKey::Gym),
            swim_gym: TintColors::default_for(TintKey::SwimGym),
        }
    }
}

pub type TintByExerciseId = BTreeMap<ExerciseId, String>;

/// Everything the planner persists, loaded and saved as one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub exercises: Vec<Exercise>,
    pub weekly_schedule: WeeklySchedule,
    pub overrides: Overrides,
    pub tint_colors: TintColors,
    pub tint_by_exercise_id: TintByExerciseId,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            exercises: Exercise::defaults(),
            weekly_schedule: WeeklySchedule::defaults(),
            overrides: Overrides::new(),
            tint_colors: TintColors::default(),
            tint_by_exercise_id: TintByExerciseId::new(),
        }
    }
}

impl Snapshot {
    pub fn exercise(&self, id: &ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|e| &e.id == id)
    }

    pub fn exercise_mut(&mut self, id: &ExerciseId) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| &e.id == id)
    }

    pub fn has_exercise(&self, id: &ExerciseId) -> bool {
        self.exercise(id).is_some()
    }

    pub fn rest_exercise(&self) -> Option<&Exercise> {
        self.exercise(&ExerciseId::rest())
    }

    /// Icons for the given ids in order. Unknown ids are skipped.
    pub fn icons_for(&self, ids: &[ExerciseId]) -> Vec<&str> {
        ids.iter()
            .filter_map(|id| self.exercise(id))
            .map(|e| e.icon.as_str())
            .collect()
    }
}
