pub const REST_ID: &str = "rest";

pub const GRID_CELLS: usize = 42;

pub const DAYS_PER_WEEK: usize = 7;

/// Opacity used when a past day is tinted with its exercise color.
pub const TINT_ALPHA: f32 = 0.18;

pub const DEFAULT_EXERCISES: [DefaultExercise; 4] = [
    DefaultExercise {
        id: "run",
        name: "Run",
        icon: "🏃",
    },
    DefaultExercise {
        id: "bike",
        name: "Bike",
        icon: "🚴",
    },
    DefaultExercise {
        id: "swim",
        name: "Swim",
        icon: "🌊",
    },
    DefaultExercise {
        id: REST_ID,
        name: "Rest",
        icon: "🛌",
    },
];

/// Index 0 is Sunday.
pub const DEFAULT_WEEKLY: [&[&str]; DAYS_PER_WEEK] = [
    &["run"],
    &["run"],
    &["run"],
    &["bike"],
    &[REST_ID],
    &["run"],
    &["run"],
];

pub const WEEKDAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const DEFAULT_TINTS: DefaultTints = DefaultTints {
    swim: "#4fc3f7",
    gym: "#a259e6",
};

pub const STORE_KEYS: StoreKeys = StoreKeys {
    exercises: "exercises",
    weekly_schedule: "weeklySchedule",
    overrides: "overrides",
    tint_colors: "tintColors",
    tint_by_exercise_id: "tintByExerciseId",
};

pub const EXERCISE_LIMITS: ExerciseLimits = ExerciseLimits {
    icon_chars: 2,
    generated_id_chars: 6,
    placeholder_name: "New",
    placeholder_icon: "❓",
};

pub const TIME_SETTINGS: TimeSettings = TimeSettings { poll_ms: 250 };

pub const BACKUP_LIMIT: usize = 10;

pub struct DefaultExercise {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

pub struct DefaultTints {
    pub swim: &'static str,
    pub gym: &'static str,
}

pub struct StoreKeys {
    pub exercises: &'static str,
    pub weekly_schedule: &'static str,
    pub overrides: &'static str,
    pub tint_colors: &'static str,
    pub tint_by_exercise_id: &'static str,
}

pub struct ExerciseLimits {
    pub icon_chars: usize,
    pub generated_id_chars: usize,
    pub placeholder_name: &'static str,
    pub placeholder_icon: &'static str,
}

pub struct TimeSettings {
    pub poll_ms: u64,
}
